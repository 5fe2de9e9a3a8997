use crate::domain::recipe::Recipe;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Raw key-value persistence. `Ok(None)` means nothing has been stored under `key` yet.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn save(&self, key: &str, data: &[u8])
        -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn plan_key(&self) -> &str;
    fn storage_enabled(&self) -> bool;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn hydration_limit(&self) -> usize;
}

/// Third-party recipe directory. Searches fail soft to empty results;
/// only the by-id lookup reports why it failed.
#[async_trait]
pub trait RecipeDirectory: Send + Sync {
    async fn search_by_name(&self, query: &str) -> Vec<Recipe>;
    async fn search_by_ingredient(&self, ingredient: &str) -> Vec<Recipe>;
    async fn get_by_category(&self, category: &str) -> Vec<Recipe>;
    async fn get_random(&self, count: usize) -> Vec<Recipe>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Recipe>>;
}
