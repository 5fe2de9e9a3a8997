pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{DetachedStorage, LocalStorage, MealDbClient, MemoryStorage};
pub use self::core::{planner::MealPlanner, shopping::build_shopping_list, store::PlanStore};
pub use domain::model::{Day, MealType, Plan, SlotKey};
pub use utils::error::{PlannerError, Result};
