//! Custom protocol handlers for efficient data transfer
//!
//! This module implements the `frame://` custom protocol for direct binary
//! transfer of render frames, bypassing Tauri's IPC JSON serialization.

use bevy::log::{debug, warn};
use tauri::http::Response as HttpResponse;

use super::encoding::{encode_jpeg, encode_png};
use super::host::BackdropHost;
use super::shared_state::Frame;
use crate::error::{BackdropError, Result};

type Response = HttpResponse<Vec<u8>>;

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.png`: PNG frame with transparency
/// - `frame.jpg`: JPEG-compressed frame, opaque
/// - `frame.raw`: Raw RGBA frame
/// - `stats`: Renderer statistics as JSON
pub fn handle_frame_protocol(uri_path: &str, host: &BackdropHost) -> Response {
    let resource = uri_path.trim_start_matches('/');
    debug!("[Protocol] Resolved resource: {}", resource);

    let result = match resource {
        "frame" | "frame.png" => frame_body(host, "image/png", encode_png),
        "frame.jpg" => frame_body(host, "image/jpeg", encode_jpeg),
        "frame.raw" => frame_body(host, "application/octet-stream", |f| Ok(f.rgba.clone())),
        "stats" => stats_body(host),
        _ => return plain(404, "Not Found"),
    };

    result.unwrap_or_else(|e| error_response(resource, e))
}

fn error_response(resource: &str, error: BackdropError) -> Response {
    match error {
        BackdropError::FrameNotReady => plain(503, "Frame not ready"),
        e => {
            warn!("[Protocol] {resource}: {e}");
            plain(500, &e.to_string())
        }
    }
}

fn frame_body(
    host: &BackdropHost,
    content_type: &str,
    encode: impl FnOnce(&Frame) -> Result<Vec<u8>>,
) -> Result<Response> {
    let frame = host.latest_frame()?;
    let body = encode(&frame)?;
    Ok(HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", frame.width.to_string())
        .header("X-Frame-Height", frame.height.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)
        .unwrap_or_default())
}

fn stats_body(host: &BackdropHost) -> Result<Response> {
    let stats = host.stats()?;
    let json = serde_json::to_vec(&stats)?;
    Ok(HttpResponse::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(json)
        .unwrap_or_default())
}

fn plain(status: u16, message: &str) -> Response {
    HttpResponse::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(message.as_bytes().to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tauri_bridge::ViewportSize;

    fn body_text(response: &Response) -> String {
        String::from_utf8_lossy(response.body()).into_owned()
    }

    #[test]
    fn missing_frame_is_service_unavailable() {
        let host = BackdropHost::default();
        let response = handle_frame_protocol("/frame.png", &host);
        assert_eq!(response.status().as_u16(), 503);
    }

    #[test]
    fn published_frame_is_served_with_its_size() {
        let host = BackdropHost::new(ViewportSize::new(2, 1).unwrap()).unwrap();
        host.frame_buffer
            .publish(Frame::new(2, 1, vec![255; 8]).unwrap())
            .unwrap();

        let response = handle_frame_protocol("/frame.raw", &host);
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.body().len(), 8);
        assert_eq!(response.headers()["X-Frame-Width"], "2");
    }

    #[test]
    fn stats_are_served_as_json() {
        let host = BackdropHost::default();
        let response = handle_frame_protocol("/stats", &host);
        assert_eq!(response.status().as_u16(), 200);

        let stats: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert_eq!(stats["mounted"], false);
    }

    #[test]
    fn serialization_failure_is_a_server_error() {
        let error = serde_json::from_str::<u32>("not a number").unwrap_err();
        let response = error_response("stats", BackdropError::from(error));
        assert_eq!(response.status().as_u16(), 500);
        assert!(body_text(&response).contains("stats serialization failed"));
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let response = handle_frame_protocol("/nope", &BackdropHost::default());
        assert_eq!(response.status().as_u16(), 404);
    }
}
