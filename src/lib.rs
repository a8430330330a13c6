//! Hero Backdrop: animated 3D background for a portfolio hero section
//!
//! A wireframe dodecahedron, a particle field and a rippling line grid are
//! rendered headless by Bevy into a transparent offscreen surface; the page
//! composites the frames behind its hero content and steers the camera with
//! the pointer.
//!
//! Architecture:
//! - Bevy runs in a background thread with NO window (true headless mode)
//! - The page drives it through a `BackdropHost`: mount/unmount, start/stop,
//!   pointer and viewport updates are applied at the start of the next tick
//! - GPU texture -> Buffer -> CPU channel -> shared frame buffer -> page
//! - With the `desktop` feature, frames reach the webview via the `frame://`
//!   protocol (PNG/JPEG/raw) or Base64-encoded RGBA commands
//!
//! # Module Structure
//!
//! - `config`: Configuration constants and settings
//! - `error`: Crate error type
//! - `tauri_bridge`: Bridge layer between the page and Bevy
//!   - `shared_state`: Thread-safe data structures
//!   - `host`: The page's handle on the renderer
//!   - `encoding`: Frame encoders
//!   - `commands`: Tauri command handlers (`desktop`)
//!   - `protocol`: Custom protocol handlers (`desktop`)
//! - `backdrop`: Bevy engine integration
//!   - `components`: ECS components
//!   - `resources`: Global resources and lifecycle state
//!   - `geometry`: Vertex data for the decorative objects
//!   - `plugins`: The backdrop plugin and GPU readback
//!   - `systems`: Mount, teardown, animation and camera systems
//!   - `app`: Application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod backdrop;
pub mod config;
pub mod error;
pub mod tauri_bridge;

pub use backdrop::{create_app, start_backdrop, BackdropPlugin, BackdropState};
pub use error::BackdropError;
pub use tauri_bridge::BackdropHost;

/// Main entry point for the Tauri application
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use bevy::log::{error, info};

    let host = BackdropHost::default();

    // The hero section is on screen from the start
    if let Err(e) = host.mount() {
        error!("[Tauri] Could not request mount: {e}");
    }

    // A renderer that cannot start leaves the page without a background only
    if let Err(e) = start_backdrop(host.clone()) {
        error!("[Tauri] Backdrop unavailable: {e}");
    }

    let protocol_host = host.clone();

    info!("[Tauri] Starting...");
    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(host)
        // Register custom protocol "frame://" for direct binary transfer
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let host = protocol_host.clone();

            // Encoding can take a while; keep it off the webview thread
            std::thread::spawn(move || {
                let path = request.uri().path().to_owned();
                let response = tauri_bridge::protocol::handle_frame_protocol(&path, &host);
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            tauri_bridge::commands::get_frame,
            tauri_bridge::commands::get_render_size,
            tauri_bridge::commands::get_renderer_stats,
            tauri_bridge::commands::set_pointer_position,
            tauri_bridge::commands::send_pointer_move,
            tauri_bridge::commands::resize_viewport,
            tauri_bridge::commands::mount_backdrop,
            tauri_bridge::commands::unmount_backdrop,
            tauri_bridge::commands::start_frames,
            tauri_bridge::commands::stop_frames
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!("[Tauri] Application error: {e}");
    }
}
