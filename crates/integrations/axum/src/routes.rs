//! Route mounting for the OTP challenge service.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method as HttpMethod, Uri};
use axum::response::Response;
use axum::routing::{delete, get, patch, post, put};
use otpgate_core::router::{Method as ServiceMethod, Router as ServiceRouter};
use otpgate_service::OtpService;
use std::sync::Arc;

use crate::{to_axum_response, to_service_request};

/// Creates an Axum router from a service route table.
///
/// Paths are registered relative to the table's base path; use [`mount`]
/// to get the nested router in one call.
pub fn otp_routes(router: ServiceRouter) -> axum::Router {
    let shared = Arc::new(router);
    let specs: Vec<(ServiceMethod, String)> = shared
        .routes()
        .map(|r| (r.method, r.path.clone()))
        .collect();

    let mut app = axum::Router::new();
    for (method, path) in specs {
        let shared = shared.clone();
        let relative = path.clone();
        let handler = move |http_method: HttpMethod, uri: Uri, headers: HeaderMap, body: Bytes| {
            let shared = shared.clone();
            let relative = relative.clone();
            async move { dispatch(shared, method, relative, http_method, uri, headers, body).await }
        };

        let method_router = match method {
            ServiceMethod::GET => get(handler),
            ServiceMethod::POST => post(handler),
            ServiceMethod::PUT => put(handler),
            ServiceMethod::PATCH => patch(handler),
            ServiceMethod::DELETE => delete(handler),
            // The service only registers GET/POST; anything else would be
            // a routing bug, so fall back to GET rather than panic.
            _ => get(handler),
        };
        app = app.route(&path, method_router);
    }
    app
}

/// Builds the fully mounted application router for a service, nested under
/// the service's base path.
pub fn mount(service: &OtpService) -> axum::Router {
    let router = service.router();
    let base_path = router.base_path.clone();
    axum::Router::new().nest(&base_path, otp_routes(router))
}

async fn dispatch(
    router: Arc<ServiceRouter>,
    method: ServiceMethod,
    relative_path: String,
    http_method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let json = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let request = to_service_request(http_method, &uri, &headers, json);

    let Some(route) = router.find(method, &relative_path) else {
        return to_axum_response(otpgate_core::router::Response::not_found());
    };
    to_axum_response(route.handler.handle(request).await)
}
