use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::{ApiError, ErrorCode};
use validator::Validate;

/// JSON extractor that runs `validator` rules before handing the body to
/// the handler. Parse and validation failures reject with INVALID_REQUEST.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(ErrorCode::InvalidRequest, format!("Invalid body: {}", e)))?;

        value
            .validate()
            .map_err(|e| ApiError::new(ErrorCode::InvalidRequest, e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}
