pub mod aggregate;
pub mod analyzer;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod schema;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use analyzer::NutritionAnalyzer;
pub use credentials::CredentialSet;
pub use error::NutritionError;
