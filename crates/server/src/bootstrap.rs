use std::sync::Arc;

use interiq_core::catalog::RateCatalog;
use interiq_core::config::{AppConfig, ConfigError, LeadStoreKind, LoadOptions};
use interiq_core::errors::ApplicationError;
use interiq_core::runtime::StandardQuotationRuntime;
use interiq_db::{
    connect_with_settings, migrations, InMemoryLeadRepository, LeadRepository, SqlLeadRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<RateCatalog>,
    pub runtime: Arc<StandardQuotationRuntime>,
    pub leads: Arc<dyn LeadRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("rate catalog rejected: {0}")]
    Catalog(#[source] ApplicationError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        lead_id = "unknown",
        "starting application bootstrap"
    );

    let catalog = RateCatalog::load_or_standard(config.catalog.path.as_deref())
        .map_err(|error| BootstrapError::Catalog(ApplicationError::from(error)))?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        lead_id = "unknown",
        source = config
            .catalog
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        rooms = catalog.rooms().len(),
        materials = catalog.material_count(),
        fixed_items = catalog.fixed_item_count(),
        "rate catalog validated"
    );

    let leads = open_lead_store(&config).await?;
    info!(
        event_name = "system.bootstrap.lead_store_ready",
        correlation_id = "bootstrap",
        lead_id = "unknown",
        storage = leads.storage_kind(),
        "lead store initialized"
    );

    let catalog = Arc::new(catalog);
    let runtime = Arc::new(StandardQuotationRuntime::with_catalog(Arc::clone(&catalog)));

    Ok(Application { config, catalog, runtime, leads })
}

async fn open_lead_store(config: &AppConfig) -> Result<Arc<dyn LeadRepository>, BootstrapError> {
    match config.leads.store {
        LeadStoreKind::Memory => {
            Ok(Arc::new(InMemoryLeadRepository::with_capacity(config.leads.memory_capacity)))
        }
        LeadStoreKind::Sqlite => {
            let pool = connect_with_settings(
                &config.database.url,
                config.database.max_connections,
                config.database.timeout_secs,
            )
            .await
            .map_err(BootstrapError::DatabaseConnect)?;
            info!(
                event_name = "system.bootstrap.database_connected",
                correlation_id = "bootstrap",
                lead_id = "unknown",
                "database connection established"
            );

            migrations::run_pending(&pool).await.map_err(BootstrapError::Migration)?;
            info!(
                event_name = "system.bootstrap.migrations_applied",
                correlation_id = "bootstrap",
                lead_id = "unknown",
                "database migrations applied"
            );

            Ok(Arc::new(SqlLeadRepository::new(pool)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use interiq_core::config::{ConfigOverrides, LeadStoreKind, LoadOptions};
    use interiq_core::estimate::EstimateRequest;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::bootstrap::{bootstrap, BootstrapError};

    #[tokio::test]
    async fn bootstrap_defaults_to_standard_catalog_and_memory_store() {
        let app = bootstrap(LoadOptions::default()).await.expect("bootstrap");

        assert_eq!(app.catalog.rooms().len(), 10);
        assert_eq!(app.leads.storage_kind(), "memory");

        let estimate = app
            .runtime
            .estimate(&EstimateRequest {
                carpet_area: Decimal::from(1300),
                budget: Decimal::from(900_000),
                rooms: vec!["Kitchen".to_string()],
            })
            .expect("estimate");
        assert_eq!(estimate.estimated_cost, Decimal::from(643_465));
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_catalog_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("rates.toml");
        fs::write(
            &path,
            "[[rooms]]\nname = \"Foyer\"\n\n[[rooms.items]]\nkind = \"area\"\nname = \"Shoe Unit\"\nmaterial = \"marble\"\nbase_area = 12\n",
        )
        .expect("write catalog");

        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides { catalog_path: Some(path), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        })
        .await;

        let error = result.err().expect("bootstrap should fail");
        assert!(matches!(error, BootstrapError::Catalog(_)));
        assert!(error.to_string().contains("marble"));
    }

    #[tokio::test]
    async fn sqlite_store_runs_migrations_on_startup() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                lead_store: Some(LeadStoreKind::Sqlite),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap with sqlite store");

        assert_eq!(app.leads.storage_kind(), "sqlite");
        app.leads.ping().await.expect("store reachable");
        let page = app.leads.list(&Default::default()).await.expect("list after migrate");
        assert_eq!(page.total, 0);
    }
}
