use bytes::Bytes;

use crate::log::log_msg::now_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, B G R A in memory order.
    Argb32,
    /// Planar Y, U, V (4:2:0).
    I420,
}

/// A decoded picture handed over by the media engine.
///
/// `data` is reference counted, so cloning a frame never copies pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row of the first plane.
    pub stride: u32,
    pub format: PixelFormat,
    pub timestamp_ms: u128,
    pub data: Bytes,
}

impl VideoFrame {
    pub fn argb32(width: u32, height: u32, stride: u32, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            stride,
            format: PixelFormat::Argb32,
            timestamp_ms: now_millis(),
            data: data.into(),
        }
    }

    /// Solid-colour frame, handy for engines without a camera and for tests.
    #[must_use]
    pub fn solid(width: u32, height: u32, bgra: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data: Vec<u8> = bgra.iter().copied().cycle().take(pixels * 4).collect();
        Self::argb32(width, height, width * 4, data)
    }
}
