use axum::http::HeaderValue;
use axum::response::Response;

pub const DEPRECATED_HEADER: &str = "x-deprecated";
pub const SUNSET_ROUTE_HEADER: &str = "x-sunset-route";
pub const DEPRECATED_METHOD_HEADER: &str = "x-deprecated-method";

/// Stamp a response bound for a legacy caller with deprecation metadata:
/// a boolean marker, the canonical replacement route, and the HTTP verb the
/// annotation applies to. Body and status are left untouched.
///
/// `sunset_route` and `method` are compile-time constants from the alias
/// table, so header construction cannot fail for any registered value; a
/// malformed constant panics loudly instead of letting an unannotated
/// response through.
pub fn annotate(mut response: Response, sunset_route: &'static str, method: &'static str) -> Response {
    let headers = response.headers_mut();
    headers.insert(DEPRECATED_HEADER, HeaderValue::from_static("true"));
    headers.insert(SUNSET_ROUTE_HEADER, HeaderValue::from_static(sunset_route));
    headers.insert(DEPRECATED_METHOD_HEADER, HeaderValue::from_static(method));
    response
}
