//! HTTP helper functions for Crux Core
//!
//! This module extracts common HTTP response handling logic from the update
//! handlers into debuggable, testable functions.

use crux_http::Response;

use crate::types::CameraImage;

/// Base URL for the rover command endpoint.
///
/// NOTE: This is a placeholder prefix required because `crux_http` requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// The shell replaces this prefix with its configured command host before
/// sending the request.
pub const BASE_URL: &str = "https://relative";

/// Command endpoint path, relative to [`BASE_URL`].
pub const COMMAND_ENDPOINT: &str = "/json";

/// Still image endpoint served by the camera host.
pub const IMAGE_URL: &str = "http://raspberrypi.local:5000/get-image";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use agribot_core::http_helpers::build_url;
/// let url = build_url("/json");
/// assert_eq!(url, "https://relative/json");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Validates HTTP response.
///
/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts error message from HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if !body.is_empty() => match String::from_utf8(body) {
            Ok(msg) => format!("{action} failed: HTTP {status}: {msg}"),
            Err(e) => format!("{action} failed: HTTP {status} (Invalid UTF-8: {e})"),
        },
        Some(_) => format!("{action} failed: HTTP {status} (Empty body)"),
        None => format!("{action} failed: HTTP {status} (No body)"),
    }
}

/// Maps a transport level error to a message.
pub fn map_http_error(action: &str, error: crux_http::HttpError) -> String {
    format!("{action} failed: {error}")
}

/// Check response status only (no body parsing).
pub fn check_response_status(action: &str, response: &mut Response<Vec<u8>>) -> Result<(), String> {
    if is_response_success(response) {
        Ok(())
    } else {
        Err(extract_error_message(action, response))
    }
}

/// Process HTTP response result and check status only
pub fn process_status_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<(), String> {
    match result {
        Ok(mut response) => check_response_status(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Process HTTP response result and decode the body as an image
pub fn process_image_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<CameraImage, String> {
    let mut response = result.map_err(|e| map_http_error(action, e))?;

    if !is_response_success(&response) {
        return Err(extract_error_message(action, &mut response));
    }

    let body = response.take_body().unwrap_or_default();
    CameraImage::from_bytes(&body).map_err(|e| format!("{action} failed: {e}"))
}

// Note: Unit tests for these helpers are not included because crux_http::Response
// has a private constructor. They are exercised through the update handler tests,
// which resolve HTTP effects with protocol level responses.
