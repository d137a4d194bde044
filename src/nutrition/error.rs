use thiserror::Error;

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("No Gemini API key available")]
    NoCredentialAvailable,

    #[error("LLM API error: {0}")]
    Transport(String),

    #[error("Failed to parse LLM response: {0}")]
    MalformedResponse(String),

    #[error("Gemini API error: {cause}")]
    AnalysisFailed { cause: String },

    #[error("Gemini API error: {cause}")]
    RecommendationFailed { cause: String },
}
