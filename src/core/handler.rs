//! HTTP-level mapping around the proximity engine.

use crate::core::engine::ProximityEngine;
use crate::core::request::Action;
use crate::domain::ports::ListStore;
use crate::utils::error::{ProximityError, Result};
use serde_json::json;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(status_code: u16, body: serde_json::Value) -> Self {
        Self {
            status_code,
            content_type: CONTENT_TYPE_JSON,
            body: body.to_string(),
        }
    }
}

pub struct RequestHandler<S: ListStore> {
    engine: ProximityEngine<S>,
    production: bool,
}

impl<S: ListStore> RequestHandler<S> {
    /// In production mode 500 responses carry no error detail.
    pub fn new(engine: ProximityEngine<S>, production: bool) -> Self {
        Self { engine, production }
    }

    pub async fn handle(&self, method: &str, body: Option<&str>) -> HttpResponse {
        if method.eq_ignore_ascii_case("GET") {
            return HttpResponse {
                status_code: 200,
                content_type: CONTENT_TYPE_HTML,
                body: INDEX_HTML.to_string(),
            };
        }

        match self.dispatch(body).await {
            Ok(body) => HttpResponse::json(200, body),
            Err(e) => self.error_response(e),
        }
    }

    async fn dispatch(&self, body: Option<&str>) -> Result<serde_json::Value> {
        let body = body
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| ProximityError::MalformedRequest {
                message: "Request body is empty".to_string(),
            })?;
        let action = Action::parse(body)?;
        let response = self.engine.execute(action).await?;
        Ok(serde_json::to_value(response)?)
    }

    fn error_response(&self, e: ProximityError) -> HttpResponse {
        if e.is_client_error() {
            tracing::warn!("Rejected request: {}", e);
            return HttpResponse::json(e.status_code(), json!({ "error": e.to_string() }));
        }

        tracing::error!("❌ Request failed ({:?}): {}", e.category(), e);
        let body = if self.production {
            json!({ "error": "Internal Server Error" })
        } else {
            json!({ "error": "Internal Server Error", "details": e.to_string() })
        };
        HttpResponse::json(e.status_code(), body)
    }
}
