use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::nutrition::NutritionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Nutrition(#[from] NutritionError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                format!("{e:#}")
            }
            other => other.to_string(),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_error_is_a_400_with_envelope() {
        let cases = [
            ApiError::BadRequest("Meal description is required".into()),
            ApiError::Nutrition(NutritionError::NoCredentialAvailable),
            ApiError::Internal(anyhow::anyhow!("disk full")),
        ];
        for err in cases {
            let expected = err.to_string();
            let res = err.into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(v["success"], false);
            assert!(v["error"].as_str().unwrap().starts_with(&expected));
        }
    }
}
