use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections surface as validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
