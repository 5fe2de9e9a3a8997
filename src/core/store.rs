use crate::domain::model::Plan;
use crate::domain::ports::Storage;
use crate::utils::error::{PlannerError, Result};

pub const DEFAULT_PLAN_KEY: &str = "weekPlan";

/// Loads and saves the weekly plan through an injected [`Storage`].
///
/// `load`, `save` and `clear` never fail: storage problems are logged and the
/// plan keeps living in memory. Use `try_load` / `try_save` to see the error.
pub struct PlanStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> PlanStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_PLAN_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn try_load(&self) -> Result<Option<Plan>> {
        match self.storage.load(&self.key).await? {
            Some(bytes) => Ok(Some(Plan::from_persisted(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn load(&self) -> Plan {
        match self.try_load().await {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                tracing::debug!("No saved plan under '{}', starting empty", self.key);
                Plan::initialize()
            }
            Err(e @ PlannerError::StorageUnavailable { .. }) => {
                tracing::debug!("Week plan not loaded, starting empty: {}", e);
                Plan::initialize()
            }
            Err(e) => {
                tracing::error!("Error loading week plan: {}", e);
                Plan::initialize()
            }
        }
    }

    pub async fn try_save(&self, plan: &Plan) -> Result<()> {
        let bytes = plan.to_persisted()?;
        self.storage.save(&self.key, &bytes).await
    }

    pub async fn save(&self, plan: &Plan) {
        match self.try_save(plan).await {
            Ok(()) => {}
            // headless runs keep the plan in memory only
            Err(e @ PlannerError::StorageUnavailable { .. }) => {
                tracing::debug!("Week plan not saved: {}", e);
            }
            Err(e) => tracing::error!("Error saving week plan: {}", e),
        }
    }

    /// Resets to an empty plan and persists it right away.
    pub async fn clear(&self) -> Plan {
        let plan = Plan::initialize();
        self.save(&plan).await;
        plan
    }
}
