use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// Used when the user has not stored any keys in their settings.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub thinking_budget: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub worker_threads: usize,
    pub static_dir: Option<String>,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://chundiet.db".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);
        let worker_threads = std::env::var("WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(8);
        let static_dir = std::env::var("STATIC_DIR").ok().filter(|v| !v.is_empty());

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            thinking_budget: match std::env::var("GEMINI_THINKING_BUDGET") {
                Ok(v) => v.parse::<u32>().ok(),
                Err(_) => Some(10587),
            },
        };

        Ok(Self {
            database_url,
            host,
            port,
            worker_threads,
            static_dir,
            gemini,
        })
    }
}
