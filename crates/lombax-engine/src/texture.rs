//! Texture headers.
//!
//! Pixel data lives in the companion VRAM blob; decoding it into an image
//! is left to the exporter's image source.

/// A texture header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Texture {
    /// Index in the texture table; what texture runs refer to.
    pub id: u32,
    pub vram_offset: u32,
    pub vram_size: u32,
    pub width: u16,
    pub height: u16,
    pub mip_count: u16,
    pub format: u16,
}

impl Texture {
    /// Number of texels in the top mip level.
    pub fn texel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// File name of the exported image, `<hex id>.png`.
    pub fn file_name(&self) -> String {
        format!("{:x}.png", self.id)
    }
}
