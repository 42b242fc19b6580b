//! `Payload` extractor: a request body sent either as JSON or as an HTML form.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use sitecrew_core::error::AppError;

use crate::error::ApiError;

/// Body decoded from `application/x-www-form-urlencoded` when the request
/// says so, and from JSON otherwise.
///
/// Unknown form fields such as `_csrf_token` are ignored.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&request) {
            let Form(value) = Form::<T>::from_request(request, state)
                .await
                .map_err(|e| AppError::validation(format!("Invalid form body: {}", e.body_text())))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(request, state)
                .await
                .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e.body_text())))?;
            Ok(Self(value))
        }
    }
}
