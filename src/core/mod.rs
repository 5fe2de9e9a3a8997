pub mod calories;
pub mod export;
pub mod planner;
pub mod shopping;
pub mod store;

pub use crate::domain::model::{Day, MealType, Plan, PlannedMeal, PlannedRecipe, SlotKey};
pub use crate::domain::ports::{ConfigProvider, RecipeDirectory, Storage};
pub use crate::domain::recipe::{IngredientPair, Recipe};
pub use crate::domain::shopping::{IngredientLine, ShoppingList};
pub use crate::utils::error::Result;
