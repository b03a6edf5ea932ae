/**
 * Router Configuration
 *
 * This module assembles the routes and wraps them in the middleware stack.
 *
 * # Middleware Order (outermost first)
 *
 * 1. `SetRequestIdLayer` - take `X-Correlation-ID` from the request or
 *    generate one
 * 2. `PropagateRequestIdLayer` - echo the correlation id on the response
 * 3. `TraceLayer` - one span per request carrying the correlation id
 * 4. `CorsLayer` - answers preflight requests before any security check
 * 5. `fill_error_path` - completes error bodies with the request path
 * 6. `authenticate` - bearer token to `RequestIdentity`
 * 7. `authorize` - the gate; the only layer that rejects requests
 */

use axum::{
    body::Body,
    extract::{MatchedPath, OriginalUri},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware::{from_fn, from_fn_with_state},
    response::Response,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span};

use crate::backend::error::{fill_error_path, ApiError};
use crate::backend::middleware::{authenticate, authorize};
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Header carrying the per-request correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Create the Axum router with all routes configured
///
/// Unknown routes fall through to a 404 handler, which still sits behind
/// the gate: anonymous callers get a 401 for them.
pub fn create_router(app_state: AppState) -> Router<()> {
    let correlation_id = HeaderName::from_static(CORRELATION_ID_HEADER);

    let router = configure_api_routes(Router::new()).fallback(not_found);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(correlation_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(correlation_id))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(cors_layer(app_state.config.cors_allowed_origins()))
        .layer(from_fn(fill_error_path))
        .layer(from_fn_with_state(app_state.clone(), authenticate))
        .layer(from_fn_with_state(app_state.clone(), authorize));

    router.layer(middleware).with_state(app_state)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    ApiError::not_found(format!("No endpoint {}", uri.path())).into_response_at(uri.path())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(CORRELATION_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(CORRELATION_ID_HEADER)])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

fn make_span(request: &Request<Body>) -> Span {
    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        correlation_id,
        user_id = tracing::field::Empty
    )
}
