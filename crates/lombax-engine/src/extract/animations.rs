use lombax_common::BeReader;
use zerocopy::byteorder::big_endian::{I16, U32};

use crate::animation::Translation;
use crate::{AnimationClip, Frame, Result};

fn quads(raw: &[[I16; 4]]) -> impl Iterator<Item = [i16; 4]> + '_ {
    raw.iter().map(|q| q.map(|c| c.get()))
}

/// Decode one animation clip.
pub fn read_clip(data: &[u8], pointer: u32) -> Result<AnimationClip> {
    let mut reader = BeReader::new_at(data, pointer as usize);
    let speed = reader.read_f32()?;
    let frame_count = reader.read_u16()?;
    reader.advance(2);

    let mut frames = Vec::with_capacity(usize::from(frame_count));
    for _ in 0..frame_count {
        let rotation_count = usize::from(reader.read_u16()?);
        let translation_count = usize::from(reader.read_u16()?);
        let rotations = quads(reader.read_slice::<[I16; 4]>(rotation_count)?).collect();
        let translations = quads(reader.read_slice::<[I16; 4]>(translation_count)?)
            .map(|raw| Translation { raw })
            .collect();
        frames.push(Frame {
            rotations,
            translations,
        });
    }

    Ok(AnimationClip { speed, frames })
}

/// Decode the player animation table: a count followed by absolute clip
/// pointers. Zero pointers become empty clips so indices stay stable.
pub fn read_player_animations(data: &[u8], pointer: u32) -> Result<Vec<AnimationClip>> {
    if pointer == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BeReader::new_at(data, pointer as usize);
    let count = reader.read_u32()? as usize;
    reader
        .read_slice::<U32>(count)?
        .iter()
        .map(|clip| match clip.get() {
            0 => Ok(AnimationClip::default()),
            clip => read_clip(data, clip),
        })
        .collect()
}
