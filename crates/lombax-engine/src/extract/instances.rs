use glam::{Quat, Vec3};
use lombax_common::BeReader;

use crate::records::{floats, InstanceRecord};
use crate::{Placement, Result, SectionEntry};

/// Decode `count` placement records (ties, shrubs or mobies).
pub fn read_placements(data: &[u8], entry: SectionEntry) -> Result<Vec<Placement>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    let records = BeReader::new_at(data, entry.pointer as usize)
        .read_slice::<InstanceRecord>(entry.count as usize)?;

    Ok(records
        .iter()
        .map(|r| Placement {
            model_id: r.model_id.get(),
            group: r.group.get(),
            position: Vec3::from_array(floats(&r.position)),
            rotation: Quat::from_array(floats(&r.rotation)),
            scale: Vec3::from_array(floats(&r.scale)),
        })
        .collect())
}
