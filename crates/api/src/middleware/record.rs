//! Body extractor producing an [`InputRecord`].

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::{Form, Json};
use rulecheck_core::record::InputRecord;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Input record decoded from the request body.
///
/// `application/json` bodies must be a JSON object. Anything else is read as
/// `application/x-www-form-urlencoded`, where `key[]` entries collect into
/// arrays.
///
/// ```ignore
/// async fn my_handler(RecordPayload(record): RecordPayload) -> AppResult<String> {
///     Ok(format!("{} fields", record.len()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RecordPayload(pub InputRecord);

impl<S> FromRequest<S> for RecordPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    tracing::debug!(error = %rejection, "Rejected JSON body");
                    AppError::BadRequest(rejection.body_text())
                })?;
            return Ok(Self(InputRecord::from(fields)));
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected form body");
                AppError::BadRequest(rejection.body_text())
            })?;
        Ok(Self(InputRecord::from_form_pairs(pairs)))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
