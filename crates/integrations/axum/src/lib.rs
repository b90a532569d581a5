//! # Otpgate Axum Integration
//!
//! Mounts the service's framework-agnostic route table on an
//! `axum::Router`, converting requests and responses at the boundary.
//! Headers survive the conversion in both directions, which is load-bearing:
//! the session identifier travels in the `Session-Id` response header.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use otpgate_axum::mount;
//!
//! let app = mount(&service);
//! axum::serve(listener, app).await?;
//! ```

mod routes;

pub use routes::{mount, otp_routes};

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use otpgate_core::router::{
    Method as ServiceMethod, Request as ServiceRequest, Response as ServiceResponse,
};
use std::collections::HashMap;

/// Converts an Axum request to a service request.
pub fn to_service_request(
    method: axum::http::Method,
    uri: &axum::http::Uri,
    headers: &HeaderMap,
    body: Option<serde_json::Value>,
) -> ServiceRequest {
    let service_method = match method {
        axum::http::Method::GET => ServiceMethod::GET,
        axum::http::Method::POST => ServiceMethod::POST,
        axum::http::Method::PUT => ServiceMethod::PUT,
        axum::http::Method::PATCH => ServiceMethod::PATCH,
        axum::http::Method::DELETE => ServiceMethod::DELETE,
        axum::http::Method::OPTIONS => ServiceMethod::OPTIONS,
        axum::http::Method::HEAD => ServiceMethod::HEAD,
        _ => ServiceMethod::GET,
    };

    let mut service_headers = HashMap::new();
    for (key, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            service_headers.insert(key.to_string(), v.to_string());
        }
    }

    // Parse query parameters
    let query: HashMap<String, String> = uri
        .query()
        .map(|q| {
            q.split('&')
                .filter_map(|pair| {
                    let mut parts = pair.splitn(2, '=');
                    Some((parts.next()?.to_string(), parts.next()?.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    ServiceRequest {
        method: service_method,
        path: uri.path().to_string(),
        query,
        headers: service_headers,
        body,
        ip: None,
    }
}

/// Converts a service response to an Axum response.
pub fn to_axum_response(service_response: ServiceResponse) -> Response {
    let status =
        StatusCode::from_u16(service_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = if let Some(body) = service_response.body {
        axum::Json(body).into_response()
    } else {
        status.into_response()
    };

    *response.status_mut() = status;

    // Add headers
    for (key, value) in service_response.headers {
        if let (Ok(name), Ok(val)) = (
            axum::http::header::HeaderName::try_from(key),
            axum::http::header::HeaderValue::try_from(value),
        ) {
            response.headers_mut().insert(name, val);
        }
    }

    response
}
