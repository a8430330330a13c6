//! Frame extraction system
//!
//! This module handles taking frames read back from the GPU and publishing
//! them to the page through the shared frame buffer.

use bevy::{prelude::*, render::renderer::RenderDevice, time::Time};

use crate::backdrop::resources::{BackdropState, HostLink, MainWorldReceiver, PublishStats};
use crate::config::performance::STATS_LOG_INTERVAL;
use crate::tauri_bridge::Frame;

/// Publish the newest copied frame, dropping stale ones
pub fn extract_and_publish_frame(
    receiver: Res<MainWorldReceiver>,
    host: Option<Res<HostLink>>,
    state: Res<State<BackdropState>>,
    mut stats: ResMut<PublishStats>,
    time: Res<Time>,
) {
    let Some(host) = host else { return };

    let mut latest = None;
    while let Ok(copied) = receiver.try_recv() {
        latest = Some(copied);
    }

    // Frames still in flight after teardown must not reattach the surface
    if *state.get() != BackdropState::Mounted {
        return;
    }
    let Some(copied) = latest else { return };

    let Some(rgba) = remove_row_padding(&copied.padded_rgba, copied.width, copied.height) else {
        return;
    };
    let frame = match Frame::new(copied.width, copied.height, rgba) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("[Backdrop] Dropping copied frame: {e}");
            return;
        }
    };

    if let Err(e) = host.frame_buffer.publish(frame) {
        warn!("[Backdrop] Could not publish frame: {e}");
        return;
    }
    stats.frames_published += 1;
    let published = stats.frames_published;
    if let Err(e) = host.stats.update(|s| s.frames_published = published) {
        warn!("[Backdrop] Could not publish stats: {e}");
    }

    let now = time.elapsed_secs_f64();
    if now - stats.last_log_time >= STATS_LOG_INTERVAL {
        debug!(
            "[Backdrop] Published frame {} ({}x{})",
            published, copied.width, copied.height
        );
        stats.last_log_time = now;
    }
}

/// Remove GPU buffer row padding alignment, returning pure RGBA data
pub fn remove_row_padding(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }

    let row_bytes = width as usize * 4;
    let aligned_row_bytes = RenderDevice::align_copy_bytes_per_row(row_bytes);

    let rgba_data = if row_bytes == aligned_row_bytes {
        data.get(..row_bytes * height as usize)?.to_vec()
    } else {
        data.chunks(aligned_row_bytes)
            .take(height as usize)
            .flat_map(|row| &row[..row_bytes.min(row.len())])
            .cloned()
            .collect()
    };

    Some(rgba_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_stripped_per_row() {
        // 10 px rows are 40 bytes, padded to the 256-byte copy alignment
        let aligned = RenderDevice::align_copy_bytes_per_row(40);
        assert_eq!(aligned, 256);

        let mut padded = vec![0u8; aligned * 2];
        padded[..40].fill(1);
        padded[aligned..aligned + 40].fill(2);

        let rgba = remove_row_padding(&padded, 10, 2).unwrap();
        assert_eq!(rgba.len(), 80);
        assert!(rgba[..40].iter().all(|&b| b == 1));
        assert!(rgba[40..].iter().all(|&b| b == 2));
    }

    #[test]
    fn aligned_rows_pass_through() {
        let data = vec![7u8; 256 * 3];
        assert_eq!(remove_row_padding(&data, 64, 3).unwrap().len(), 768);
    }

    #[test]
    fn empty_data_yields_nothing() {
        assert!(remove_row_padding(&[], 10, 2).is_none());
    }
}
