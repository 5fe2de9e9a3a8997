use crate::domain::ports::{ConfigProvider, RecipeDirectory};
use crate::domain::recipe::{IngredientPair, Recipe, MAX_INGREDIENTS};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_ENDPOINT: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_HYDRATION_LIMIT: usize = 12;
pub const DEFAULT_CONCURRENCY: usize = 4;

type RawMeal = HashMap<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<Vec<RawMeal>>,
}

/// Client for a TheMealDB-style recipe directory.
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
    hydration_limit: usize,
    concurrency: usize,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            hydration_limit: DEFAULT_HYDRATION_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.api_endpoint().to_string(),
            hydration_limit: config.hydration_limit(),
            concurrency: config.concurrent_requests().max(1),
        })
    }

    pub fn with_hydration_limit(mut self, limit: usize) -> Self {
        self.hydration_limit = limit;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_meals(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<RawMeal>> {
        let url = self.url(path);
        tracing::debug!("Making directory request to: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("Directory response status: {}", response.status());

        let body: MealsResponse = response.json().await?;
        Ok(body.meals.unwrap_or_default())
    }

    async fn fetch_recipes(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Recipe>> {
        let meals = self.fetch_meals(path, query).await?;
        Ok(meals.iter().filter_map(recipe_from_meal).collect())
    }

    async fn lookup(&self, id: &str) -> Result<Option<Recipe>> {
        let meals = self.fetch_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.first().and_then(recipe_from_meal))
    }

    /// Filter endpoints only return ids; each one is looked up for the full record.
    async fn hydrate(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Recipe>> {
        let summaries = self.fetch_meals(path, query).await?;
        let ids: Vec<String> = summaries
            .iter()
            .filter_map(|meal| text_field(meal, "idMeal"))
            .take(self.hydration_limit)
            .collect();

        tracing::debug!("Hydrating {} of {} filter results", ids.len(), summaries.len());

        let recipes: Vec<Recipe> = stream::iter(ids)
            .map(|id| async move {
                match self.lookup(&id).await {
                    Ok(recipe) => recipe,
                    Err(e) => {
                        tracing::warn!("Dropping recipe {} from results: {}", id, e);
                        None
                    }
                }
            })
            .buffered(self.concurrency)
            .filter_map(|recipe| async move { recipe })
            .collect()
            .await;

        Ok(recipes)
    }

    fn soften(operation: &str, result: Result<Vec<Recipe>>) -> Vec<Recipe> {
        result.unwrap_or_else(|e| {
            tracing::error!("Error {}: {}", operation, e);
            Vec::new()
        })
    }
}

#[async_trait]
impl RecipeDirectory for MealDbClient {
    async fn search_by_name(&self, query: &str) -> Vec<Recipe> {
        Self::soften(
            "searching recipes",
            self.fetch_recipes("search.php", &[("s", query)]).await,
        )
    }

    async fn search_by_ingredient(&self, ingredient: &str) -> Vec<Recipe> {
        Self::soften(
            "searching recipes by ingredient",
            self.hydrate("filter.php", &[("i", ingredient)]).await,
        )
    }

    async fn get_by_category(&self, category: &str) -> Vec<Recipe> {
        Self::soften(
            "fetching recipes by category",
            self.hydrate("filter.php", &[("c", category)]).await,
        )
    }

    async fn get_random(&self, count: usize) -> Vec<Recipe> {
        stream::iter(0..count)
            .map(|_| async move {
                match self.fetch_recipes("random.php", &[]).await {
                    Ok(recipes) => recipes.into_iter().next(),
                    Err(e) => {
                        tracing::warn!("Random recipe request failed: {}", e);
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|recipe| async move { recipe })
            .collect()
            .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        self.lookup(id).await
    }
}

fn text_field(meal: &RawMeal, field: &str) -> Option<String> {
    match meal.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Folds the flat `strIngredientN` / `strMeasureN` columns into pairs.
fn recipe_from_meal(meal: &RawMeal) -> Option<Recipe> {
    let id = text_field(meal, "idMeal").filter(|id| !id.trim().is_empty())?;
    let name = text_field(meal, "strMeal").unwrap_or_default();

    let ingredients = (1..=MAX_INGREDIENTS)
        .map(|i| IngredientPair {
            ingredient: text_field(meal, &format!("strIngredient{}", i)),
            measure: text_field(meal, &format!("strMeasure{}", i)),
        })
        .filter(|pair| pair.ingredient.is_some() || pair.measure.is_some())
        .collect();

    Some(Recipe {
        id,
        name,
        category: text_field(meal, "strCategory"),
        area: text_field(meal, "strArea"),
        instructions: text_field(meal, "strInstructions"),
        thumbnail: text_field(meal, "strMealThumb"),
        tags: text_field(meal, "strTags"),
        youtube: text_field(meal, "strYoutube"),
        ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn meal_json(id: &str, name: &str, ingredients: &[(&str, &str)]) -> serde_json::Value {
        let mut meal = serde_json::json!({
            "idMeal": id,
            "strMeal": name,
            "strCategory": "Vegetarian",
            "strMealThumb": format!("https://img.example/{}.jpg", id),
        });
        let fields = meal.as_object_mut().unwrap();
        for i in 1..=MAX_INGREDIENTS {
            let (ingredient, measure) = ingredients
                .get(i - 1)
                .map(|(ing, m)| (serde_json::json!(ing), serde_json::json!(m)))
                .unwrap_or((serde_json::json!(""), serde_json::Value::Null));
            fields.insert(format!("strIngredient{}", i), ingredient);
            fields.insert(format!("strMeasure{}", i), measure);
        }
        meal
    }

    #[tokio::test]
    async fn test_get_by_id_converts_flat_record() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/lookup.php").query_param("i", "52771");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "meals": [meal_json("52771", "Spicy Arrabiata Penne", &[("penne rigate", "1 pound"), ("olive oil", "1/4 cup")])]
                }));
        });

        let client = MealDbClient::new(server.base_url());
        let recipe = client.get_by_id("52771").await.unwrap().unwrap();

        api_mock.assert();
        assert_eq!(recipe.name, "Spicy Arrabiata Penne");
        assert_eq!(recipe.category.as_deref(), Some("Vegetarian"));
        assert_eq!(recipe.ingredient_count(), 2);
        let present: Vec<(&str, &str)> = recipe.present_ingredients().collect();
        assert_eq!(present[1], ("olive oil", "1/4 cup"));
    }

    #[tokio::test]
    async fn test_get_by_id_null_meals_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/lookup.php");
            then.status(200).json_body(serde_json::json!({ "meals": null }));
        });

        let client = MealDbClient::new(server.base_url());
        assert!(client.get_by_id("0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_server_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/lookup.php");
            then.status(500);
        });

        let client = MealDbClient::new(server.base_url());
        assert!(client.get_by_id("52771").await.is_err());
    }

    #[tokio::test]
    async fn test_search_failure_is_soft() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/search.php").query_param("s", "soup");
            then.status(503);
        });

        let client = MealDbClient::new(server.base_url());
        let recipes = client.search_by_name("soup").await;

        api_mock.assert();
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_filter_results_are_hydrated_up_to_limit() {
        let server = MockServer::start();
        let summaries: Vec<serde_json::Value> = (1..=15)
            .map(|i| serde_json::json!({ "idMeal": i.to_string(), "strMeal": format!("Meal {}", i) }))
            .collect();

        let filter_mock = server.mock(|when, then| {
            when.method(GET).path("/filter.php").query_param("c", "Seafood");
            then.status(200).json_body(serde_json::json!({ "meals": summaries }));
        });
        let lookup_mock = server.mock(|when, then| {
            when.method(GET).path("/lookup.php");
            then.status(200).json_body(serde_json::json!({
                "meals": [meal_json("7", "Fish Pie", &[("Haddock", "250g")])]
            }));
        });

        let client = MealDbClient::new(server.base_url()).with_hydration_limit(12);
        let recipes = client.get_by_category("Seafood").await;

        filter_mock.assert();
        lookup_mock.assert_hits(12);
        assert_eq!(recipes.len(), 12);
    }

    #[tokio::test]
    async fn test_get_random_collects_one_recipe_per_request() {
        let server = MockServer::start();
        let random_mock = server.mock(|when, then| {
            when.method(GET).path("/random.php");
            then.status(200).json_body(serde_json::json!({
                "meals": [meal_json("9", "Shakshuka", &[("Eggs", "4")])]
            }));
        });

        let client = MealDbClient::new(server.base_url());
        let recipes = client.get_random(3).await;

        random_mock.assert_hits(3);
        assert_eq!(recipes.len(), 3);
        assert!(recipes.iter().all(|r| r.name == "Shakshuka"));
    }

    #[tokio::test]
    async fn test_get_random_drops_failed_requests() {
        let server = MockServer::start();
        let random_mock = server.mock(|when, then| {
            when.method(GET).path("/random.php");
            then.status(500);
        });

        let client = MealDbClient::new(server.base_url());
        let recipes = client.get_random(4).await;

        random_mock.assert_hits(4);
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_get_random_skips_empty_responses() {
        let server = MockServer::start();
        let random_mock = server.mock(|when, then| {
            when.method(GET).path("/random.php");
            then.status(200).json_body(serde_json::json!({ "meals": null }));
        });

        let client = MealDbClient::new(server.base_url()).with_concurrency(2);
        let recipes = client.get_random(3).await;

        random_mock.assert_hits(3);
        assert!(recipes.is_empty());
    }
}
