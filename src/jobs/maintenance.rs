use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::config::JobsConfig;
use crate::store::Store;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("maintenance interval must be non-zero")]
    ZeroInterval,
}

/// Start the recurring maintenance sweep: purge checklist items that were
/// completed longer ago than the configured retention. Call through
/// `JobBootstrap` only.
pub fn start(store: Arc<dyn Store>, config: &JobsConfig) -> Result<(), JobError> {
    if config.maintenance_interval_secs == 0 {
        return Err(JobError::ZeroInterval);
    }

    let period = Duration::from_secs(config.maintenance_interval_secs);
    let retention = chrono::Duration::days(config.checklist_retention_days);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match store.purge_done_checklist(Utc::now() - retention).await {
                Ok(0) => {}
                Ok(purged) => {
                    tracing::info!("maintenance sweep purged {} completed checklist items", purged)
                }
                Err(e) => tracing::error!("maintenance sweep failed: {}", e),
            }
        }
    });

    tracing::info!(
        "maintenance job started (every {}s, retention {} days)",
        config.maintenance_interval_secs,
        config.checklist_retention_days
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let config = JobsConfig {
            maintenance_enabled: true,
            maintenance_interval_secs: 0,
            checklist_retention_days: 7,
        };
        let result = start(Arc::new(MemoryStore::new()), &config);
        assert!(matches!(result, Err(JobError::ZeroInterval)));
    }
}
