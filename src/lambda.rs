#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use road_proximity::adapters::redis_store::RedisListStore;
#[cfg(feature = "lambda")]
use road_proximity::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use road_proximity::{RequestHandler, ServiceConfig};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::collections::HashMap;

/// API Gateway proxy event. REST APIs (payload v1) send `httpMethod`;
/// HTTP APIs (payload v2) send `requestContext.http.method`.
#[cfg(feature = "lambda")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub http_method: Option<String>,
    pub request_context: Option<RequestContext>,
    pub body: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct HttpContext {
    pub method: Option<String>,
}

#[cfg(feature = "lambda")]
impl Request {
    fn method(&self) -> &str {
        self.http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|c| c.http.as_ref())
                    .and_then(|h| h.method.as_deref())
            })
            .unwrap_or("POST")
    }
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &RequestHandler<RedisListStore>,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    let request = event.payload;
    let method = request.method().to_string();
    tracing::info!(request_id = %event.context.request_id, "Handling {} request", method);

    let response = handler.handle(&method, request.body.as_deref()).await;

    Ok(Response {
        status_code: response.status_code,
        headers: HashMap::from([(
            "Content-Type".to_string(),
            response.content_type.to_string(),
        )]),
        body: response.body,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 建立一次配置與儲存連線，所有調用共用
    let config = ServiceConfig::from_env()?;
    config.validate()?;
    let handler = config.build_handler(config.redis_store()?)?;
    tracing::info!(
        collection = %config.collection_key,
        radius_km = config.search_radius_km,
        "Road proximity Lambda ready"
    );

    let handler = &handler;
    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(handler, event).await
    }))
    .await
}
