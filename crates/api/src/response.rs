//! Shared response types for API handlers.
//!
//! Listing responses use a `{ "data": ... }` envelope per project conventions.
//! Validation results use [`ValidationResponse`], which renders either the
//! plain-text violation list or a JSON body depending on `Accept`.

use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rulecheck_core::violation::ViolationList;
use serde::Serialize;
use serde_json::json;

/// Body returned when a record passes every rule.
pub const SUCCESS_BODY: &str = "Success";

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Json(DataResponse { data: items })
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// How to render violations back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// One `field: message` line per violation.
    Text,
    Json,
}

impl ResponseFormat {
    /// JSON when the `Accept` header asks for `application/json`, text otherwise.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|item| {
                item.split(';')
                    .next()
                    .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
            });
        if wants_json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Text
        }
    }
}

/// Outcome of validating one request.
///
/// No violations renders `200 Success`; otherwise `400` with the violations.
#[derive(Debug)]
pub struct ValidationResponse {
    pub violations: ViolationList,
    pub format: ResponseFormat,
}

impl IntoResponse for ValidationResponse {
    fn into_response(self) -> Response {
        if self.violations.is_empty() {
            return (StatusCode::OK, SUCCESS_BODY).into_response();
        }

        match self.format {
            ResponseFormat::Text => {
                (StatusCode::BAD_REQUEST, self.violations.to_string()).into_response()
            }
            ResponseFormat::Json => {
                let rendered: Vec<_> = self
                    .violations
                    .iter()
                    .map(|v| {
                        json!({
                            "field": v.field,
                            "code": v.code,
                            "message": v.render(),
                            "template": v.message,
                            "params": v.params,
                        })
                    })
                    .collect();
                let body = json!({
                    "error": format!("{} validation error(s)", rendered.len()),
                    "code": "VALIDATION_ERROR",
                    "violations": rendered,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn negotiates_json_only_when_asked() {
        assert_eq!(
            ResponseFormat::negotiate(&accept("application/json")),
            ResponseFormat::Json
        );
        assert_eq!(
            ResponseFormat::negotiate(&accept("text/html, application/json;q=0.9")),
            ResponseFormat::Json
        );
        assert_eq!(
            ResponseFormat::negotiate(&accept("text/plain")),
            ResponseFormat::Text
        );
        assert_eq!(
            ResponseFormat::negotiate(&HeaderMap::new()),
            ResponseFormat::Text
        );
    }

    #[test]
    fn empty_list_is_success() {
        let response = ValidationResponse {
            violations: ViolationList::new(),
            format: ResponseFormat::Json,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
