use crate::core::calories::{estimate_calories, CalorieSummary};
use crate::core::shopping::build_shopping_list;
use crate::core::store::PlanStore;
use crate::domain::model::{Plan, PlannedMeal, SlotKey};
use crate::domain::ports::{RecipeDirectory, Storage};
use crate::domain::recipe::Recipe;
use crate::domain::shopping::ShoppingList;
use crate::utils::error::{PlannerError, Result};

/// Ties the plan store to the recipe directory: every mutation is saved
/// right after it is computed.
pub struct MealPlanner<S: Storage, D: RecipeDirectory> {
    store: PlanStore<S>,
    directory: D,
    concurrency: usize,
}

impl<S: Storage, D: RecipeDirectory> MealPlanner<S, D> {
    pub fn new(store: PlanStore<S>, directory: D) -> Self {
        Self {
            store,
            directory,
            concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub async fn plan(&self) -> Plan {
        self.store.load().await
    }

    /// Looks the recipe up, estimates its calories for the slot and saves the plan.
    pub async fn assign(&self, key: SlotKey, recipe_id: &str) -> Result<Plan> {
        let recipe = self
            .directory
            .get_by_id(recipe_id)
            .await?
            .ok_or_else(|| PlannerError::DirectoryFetchFailure {
                recipe_id: recipe_id.to_string(),
                message: "recipe not found".to_string(),
            })?;

        self.assign_recipe(key, &recipe).await
    }

    pub async fn assign_recipe(&self, key: SlotKey, recipe: &Recipe) -> Result<Plan> {
        let meal = PlannedMeal::new(
            recipe.id.as_str(),
            recipe.name.as_str(),
            recipe.thumbnail.clone(),
            Some(estimate_calories(recipe, key.meal_type)),
        )?;

        let plan = self.store.load().await.with_meal(key, meal);
        self.store.save(&plan).await;
        tracing::info!("Planned '{}' for {}", recipe.name, key);
        Ok(plan)
    }

    pub async fn unassign(&self, key: SlotKey) -> Plan {
        let plan = self.store.load().await.remove_recipe(key);
        self.store.save(&plan).await;
        tracing::info!("Cleared {}", key);
        plan
    }

    pub async fn clear(&self) -> Plan {
        tracing::info!("Clearing the week plan");
        self.store.clear().await
    }

    pub async fn shopping_list(&self) -> ShoppingList {
        let plan = self.store.load().await;
        build_shopping_list(&plan, &self.directory, self.concurrency).await
    }

    pub async fn calories(&self) -> CalorieSummary {
        CalorieSummary::from_plan(&self.store.load().await)
    }
}
