//! Texture images.
//!
//! Decoding texels is not this crate's concern: images come from a
//! [`TextureImages`] source. [`RawVramImages`] reads uncompressed RGBA8
//! straight out of the companion VRAM blob.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use lombax_common::LeReader;
use lombax_engine::{Mesh, Texture};

use crate::material::texture_file_name;
use crate::{Error, Result};

/// Something that can produce the image of a texture.
pub trait TextureImages: Sync {
    fn texture_image(&self, texture: &Texture) -> Result<RgbaImage>;
}

/// Reads the top mip level as raw RGBA8 at the texture's VRAM offset.
#[derive(Debug, Clone, Copy)]
pub struct RawVramImages<'a> {
    vram: &'a [u8],
}

impl<'a> RawVramImages<'a> {
    pub fn new(vram: &'a [u8]) -> Self {
        Self { vram }
    }
}

impl TextureImages for RawVramImages<'_> {
    fn texture_image(&self, texture: &Texture) -> Result<RgbaImage> {
        if texture.width == 0 || texture.height == 0 {
            return Err(Error::InvalidTexture {
                id: texture.id,
                reason: "zero-sized",
            });
        }

        let len = texture.texel_count() * 4;
        let texels = LeReader::new(self.vram).block(texture.vram_offset as usize, len)?;
        RgbaImage::from_raw(u32::from(texture.width), u32::from(texture.height), texels.to_vec())
            .ok_or(Error::InvalidTexture {
                id: texture.id,
                reason: "texel buffer size mismatch",
            })
    }
}

/// Write one texture as `<hex id>.png` inside `dir`.
pub fn write_texture_image(images: &dyn TextureImages, texture: &Texture, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(texture_file_name(texture.id as i32));
    images.texture_image(texture)?.save(&path)?;
    Ok(path)
}

/// Images for the texture side-channel of per-mesh exports.
#[derive(Clone, Copy)]
pub struct TextureSideChannel<'a> {
    pub images: &'a dyn TextureImages,
    /// The level's texture table; texture ids index into it.
    pub textures: &'a [Texture],
}

impl TextureSideChannel<'_> {
    /// Write the image of every texture `mesh` uses next to `output`.
    ///
    /// Best effort: failures are logged and skipped. Returns the number of
    /// images written.
    pub fn write_for_mesh(&self, mesh: &Mesh, output: &Path) -> usize {
        let dir = output.parent().unwrap_or_else(|| Path::new("."));
        let mut written = 0;

        for id in mesh.texture_ids() {
            let Some(texture) = self.textures.get(id as usize) else {
                tracing::warn!(texture = id, mesh = mesh.id, "texture id out of range");
                continue;
            };
            match write_texture_image(self.images, texture, dir) {
                Ok(_) => written += 1,
                Err(e) => tracing::warn!(texture = id, error = %e, "failed to write texture image"),
            }
        }

        written
    }
}
