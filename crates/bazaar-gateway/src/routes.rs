//! Request routing and interception

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::Response;
use axum::Router;
use tracing::debug;
use url::Url;

use bazaar_core::Request;

use crate::config::RouteConfig;
use crate::error::GatewayError;
use crate::state::AppState;

/// Response headers that must not be forwarded from an upstream snapshot
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "content-length",
    "upgrade",
];

/// Maps incoming request paths to upstream URLs.
///
/// A prefix route (longest prefix wins) rewrites the path onto its target
/// base; everything else resolves against the storefront origin. This is
/// how catalog API calls and page/asset requests end up with the full URLs
/// the classifier's policy lists are written against.
pub struct TargetRouter {
    origin: Url,
    routes: Vec<(String, String)>,
}

impl TargetRouter {
    pub fn new(origin: Url, routes: &[RouteConfig]) -> Result<Self> {
        let mut compiled: Vec<(String, String)> = routes
            .iter()
            .map(|r| {
                Url::parse(&r.target)
                    .with_context(|| format!("Invalid route target: {}", r.target))?;
                Ok((r.prefix.clone(), r.target.clone()))
            })
            .collect::<Result<_>>()?;
        // Longest prefix first
        compiled.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Self {
            origin,
            routes: compiled,
        })
    }

    /// Resolve an incoming path (with optional query) to an upstream URL
    pub fn resolve(&self, path_and_query: &str) -> Result<Url, GatewayError> {
        for (prefix, target) in &self.routes {
            if let Some(rest) = path_and_query.strip_prefix(prefix.as_str()) {
                return Url::parse(&format!("{}{}", target, rest))
                    .map_err(|e| GatewayError::BadRequest(e.to_string()));
            }
        }

        self.origin
            .join(path_and_query)
            .map_err(|e| GatewayError::BadRequest(e.to_string()))
    }
}

/// Build the gateway router: every request falls through to interception
pub fn create_router(state: AppState) -> Router {
    Router::new().fallback(intercept).with_state(state)
}

/// Feed an incoming request through the offline worker
async fn intercept(
    State(state): State<AppState>,
    req: axum::extract::Request,
) -> Result<Response, GatewayError> {
    let (parts, body) = req.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let url = state.targets.resolve(path_and_query)?;

    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| GatewayError::BadRequest(e.to_string()))?;

    let request = Request::new(parts.method, url, body);
    debug!("Intercepting {} {}", request.method, request.url);

    let served = state.worker.on_intercept(&request).await?;
    let source = served.source();
    let response = served.into_response();

    let mut builder = Response::builder().status(response.status);
    for (name, value) in &response.headers {
        if HOP_BY_HOP.contains(&name.to_ascii_lowercase().as_str()) {
            continue;
        }
        if let Ok(value) = HeaderValue::from_str(value) {
            builder = builder.header(name.as_str(), value);
        }
    }
    builder = builder.header("x-served-by", source);

    builder
        .body(Body::from(response.body))
        .map_err(|e| GatewayError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> TargetRouter {
        TargetRouter::new(
            Url::parse("http://localhost:3000").unwrap(),
            &[RouteConfig {
                prefix: "/products".to_string(),
                target: "https://dummyjson.com/products".to_string(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_prefix_maps_to_api() {
        let r = router();
        assert_eq!(
            r.resolve("/products").unwrap().as_str(),
            "https://dummyjson.com/products"
        );
        assert_eq!(
            r.resolve("/products/5").unwrap().as_str(),
            "https://dummyjson.com/products/5"
        );
        assert_eq!(
            r.resolve("/products?limit=10").unwrap().as_str(),
            "https://dummyjson.com/products?limit=10"
        );
    }

    #[test]
    fn test_everything_else_resolves_against_origin() {
        let r = router();
        assert_eq!(
            r.resolve("/offline.html").unwrap().as_str(),
            "http://localhost:3000/offline.html"
        );
        assert_eq!(
            r.resolve("/_next/static/main.js").unwrap().as_str(),
            "http://localhost:3000/_next/static/main.js"
        );
    }

    #[test]
    fn test_invalid_route_target_is_rejected() {
        let result = TargetRouter::new(
            Url::parse("http://localhost:3000").unwrap(),
            &[RouteConfig {
                prefix: "/x".to_string(),
                target: "not a url".to_string(),
            }],
        );
        assert!(result.is_err());
    }
}
