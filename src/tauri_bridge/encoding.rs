//! Frame encoders used by the command and protocol handlers

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    ImageBuffer, ImageEncoder, Rgba,
};

use crate::config::compression::JPEG_QUALITY;
use crate::error::{BackdropError, Result};

use super::shared_state::{Frame, FrameResponse};

/// Encode as PNG, keeping the alpha channel so the page shows through
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data).write_image(
        &frame.rgba,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_data)
}

/// Encode as JPEG (no alpha channel)
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or(
            BackdropError::InvalidFrame {
                width: frame.width,
                height: frame.height,
                len: frame.rgba.len(),
            },
        )?;

    // Convert RGBA to RGB for JPEG
    let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut jpeg_data = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY).write_image(
        rgb_img.as_raw(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg_data)
}

/// Base64 RGBA payload for the `get_frame` command
pub fn frame_response(frame: &Frame) -> FrameResponse {
    FrameResponse {
        data: STANDARD.encode(&frame.rgba),
        width: frame.width,
        height: frame.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Frame {
        let mut rgba = Vec::new();
        for i in 0..16u8 {
            let v = if i % 2 == 0 { 255 } else { 0 };
            rgba.extend_from_slice(&[v, v, v, if i < 8 { 0 } else { 255 }]);
        }
        Frame::new(4, 4, rgba).unwrap()
    }

    #[test]
    fn png_round_trips_with_alpha() {
        let frame = checker();
        let png = encode_png(&frame).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.as_raw(), &frame.rgba);
    }

    #[test]
    fn jpeg_has_soi_marker() {
        let jpeg = encode_jpeg(&checker()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn response_carries_size() {
        let response = frame_response(&checker());
        assert_eq!((response.width, response.height), (4, 4));
        assert_eq!(STANDARD.decode(response.data).unwrap().len(), 64);
    }
}
