use lombax_common::BeReader;
use zerocopy::byteorder::big_endian::I32;

use crate::records::TextureRecord;
use crate::{Result, SectionEntry, Texture};

/// Decode the texture table. A texture's id is its table index.
pub fn read_textures(data: &[u8], entry: SectionEntry) -> Result<Vec<Texture>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    let records = BeReader::new_at(data, entry.pointer as usize)
        .read_slice::<TextureRecord>(entry.count as usize)?;

    Ok(records
        .iter()
        .enumerate()
        .map(|(id, r)| Texture {
            id: id as u32,
            vram_offset: r.vram_offset.get(),
            vram_size: r.vram_size.get(),
            width: r.width.get(),
            height: r.height.get(),
            mip_count: r.mip_count.get(),
            format: r.format.get(),
        })
        .collect())
}

/// Decode the texture ids used by the menu.
pub fn read_texture_config_menu(data: &[u8], entry: SectionEntry) -> Result<Vec<i32>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    Ok(BeReader::new_at(data, entry.pointer as usize)
        .read_slice::<I32>(entry.count as usize)?
        .iter()
        .map(|v| v.get())
        .collect())
}
