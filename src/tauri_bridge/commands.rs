//! Tauri command handlers
//!
//! This module contains all the Tauri command functions that can be invoked
//! from the frontend JavaScript/TypeScript code.

use tauri::State;

use super::encoding::frame_response;
use super::host::BackdropHost;
use super::shared_state::{FrameResponse, RendererStats};

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(host: State<BackdropHost>) -> Result<FrameResponse, String> {
    let frame = host.latest_frame().map_err(|e| e.to_string())?;
    Ok(frame_response(&frame))
}

/// Get the render resolution
#[tauri::command]
pub fn get_render_size(host: State<BackdropHost>) -> Result<(u32, u32), String> {
    let viewport = host.viewport().map_err(|e| e.to_string())?;
    Ok((viewport.width, viewport.height))
}

/// Get renderer statistics
#[tauri::command]
pub fn get_renderer_stats(host: State<BackdropHost>) -> Result<RendererStats, String> {
    host.stats().map_err(|e| e.to_string())
}

/// Receive a normalized pointer position (each axis in [-1, 1])
#[tauri::command]
pub fn set_pointer_position(host: State<BackdropHost>, x: f32, y: f32) -> Result<(), String> {
    host.set_pointer(x, y).map_err(|e| e.to_string())
}

/// Receive a pointer-move event in client pixels
#[tauri::command]
pub fn send_pointer_move(
    host: State<BackdropHost>,
    client_x: f32,
    client_y: f32,
) -> Result<(), String> {
    host.pointer_moved(client_x, client_y)
        .map_err(|e| e.to_string())
}

/// Receive the page's new viewport size
#[tauri::command]
pub fn resize_viewport(host: State<BackdropHost>, width: u32, height: u32) -> Result<(), String> {
    host.resize(width, height).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn mount_backdrop(host: State<BackdropHost>) -> Result<(), String> {
    host.mount().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn unmount_backdrop(host: State<BackdropHost>) -> Result<(), String> {
    host.unmount().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn start_frames(host: State<BackdropHost>) -> Result<(), String> {
    host.start().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn stop_frames(host: State<BackdropHost>) -> Result<(), String> {
    host.stop().map_err(|e| e.to_string())
}
