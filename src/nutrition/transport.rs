use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use super::error::NutritionError;

/// Lazily produced text fragments; their concatenation is one JSON document.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, NutritionError>> + Send>>;

/// One structured-generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub response_schema: serde_json::Value,
    pub thinking_budget: Option<u32>,
}

#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn stream_generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TextStream, NutritionError>;
}
