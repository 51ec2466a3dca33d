use lombax_common::BeReader;

use crate::records::{floats, LightConfigRecord, LightRecord};
use crate::{Light, LightConfig, Result, SectionEntry};

/// Decode the light table.
pub fn read_lights(data: &[u8], entry: SectionEntry) -> Result<Vec<Light>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    let records = BeReader::new_at(data, entry.pointer as usize)
        .read_slice::<LightRecord>(entry.count as usize)?;

    Ok(records
        .iter()
        .map(|r| Light {
            color_a: floats(&r.color_a),
            direction_a: floats(&r.direction_a),
            color_b: floats(&r.color_b),
            direction_b: floats(&r.direction_b),
        })
        .collect())
}

/// Decode the light config block, if present.
pub fn read_light_config(data: &[u8], pointer: u32) -> Result<Option<LightConfig>> {
    if pointer == 0 {
        return Ok(None);
    }

    let r: LightConfigRecord = BeReader::new_at(data, pointer as usize).read_struct()?;
    Ok(Some(LightConfig {
        ambient: floats(&r.ambient),
        fog_color: floats(&r.fog_color),
        fog_near: r.fog_near.get(),
        fog_far: r.fog_far.get(),
        fog_near_intensity: r.fog_near_intensity.get(),
        fog_far_intensity: r.fog_far_intensity.get(),
    }))
}
