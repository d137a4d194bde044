use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::nutrition::gemini::GeminiTransport;
use crate::nutrition::transport::GenerationTransport;
use crate::nutrition::{CredentialSet, NutritionAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub analyzer: NutritionAnalyzer,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = db::connect(&config.database_url).await?;

        let transport =
            Arc::new(GeminiTransport::new(&config.gemini.base_url)) as Arc<dyn GenerationTransport>;

        Ok(Self::from_parts(db, config, transport))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        transport: Arc<dyn GenerationTransport>,
    ) -> Self {
        let analyzer = NutritionAnalyzer::new(
            transport,
            config.gemini.model.clone(),
            config.gemini.thinking_budget,
        );
        Self {
            db,
            config,
            analyzer,
        }
    }

    /// Fresh per-request key rotation state built from the user's stored keys.
    pub fn credentials(&self, keys: Vec<String>) -> CredentialSet {
        CredentialSet::new(keys, self.config.gemini.api_key.clone())
    }

    #[cfg(test)]
    pub async fn fake(transport: Arc<dyn GenerationTransport>) -> Self {
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            worker_threads: 1,
            static_dir: None,
            gemini: crate::config::GeminiConfig {
                api_key: None,
                model: "gemini-2.5-flash".into(),
                base_url: "http://gemini.invalid".into(),
                thinking_budget: Some(10587),
            },
        });
        Self::from_parts(db::memory().await, config, transport)
    }
}
