use lombax_common::BeReader;
use zerocopy::byteorder::big_endian::{F32, U32};

use crate::records::{
    floats, BoneDataRecord, BoneMatrixRecord, MeshHeader, ModelEntryRecord, SkinRecord,
    TextureRunRecord,
};
use crate::{AnimationClip, Bone, Mesh, Result, SectionEntry, SkinWeights, TextureRun, Vertex};

use super::read_clip;

/// Decode the mesh record at `pointer`.
///
/// Sub-blocks are addressed relative to the record. Skin data is only read
/// when the record's skin flag is set; the skeleton length comes from the
/// record's own bone count.
pub fn read_mesh(data: &[u8], pointer: u32) -> Result<Mesh> {
    let base = pointer as usize;
    let header: MeshHeader = BeReader::new_at(data, base).read_struct()?;
    let at = |relative: &U32| base.saturating_add(relative.get() as usize);

    let mut reader = BeReader::new_at(data, at(&header.payload_offset));
    let run_count = reader.read_u32()? as usize;
    let texture_runs = reader
        .read_slice::<TextureRunRecord>(run_count)?
        .iter()
        .map(|r| TextureRun {
            texture_id: r.texture_id.get(),
            start: r.start.get(),
        })
        .collect();

    let vertex_count = header.vertex_count.get() as usize;
    let vertices = reader
        .read_slice::<[F32; 8]>(vertex_count)?
        .iter()
        .map(|v| Vertex::from_scalars(floats(v)))
        .collect();
    let indices = reader.read_u16_vec(header.index_count.get() as usize)?;

    let skin = if header.has_skin() {
        let skin = reader
            .read_slice::<SkinRecord>(vertex_count)?
            .iter()
            .map(|s| SkinWeights {
                bone_ids: s.bone_ids.get(),
                weights: s.weights.get(),
            })
            .collect();
        Some(skin)
    } else {
        None
    };

    let bone_count = header.bone_count.get() as usize;
    let bones = if bone_count > 0 {
        let mut reader = BeReader::new_at(data, at(&header.skeleton_offset));
        let matrices = reader.read_slice::<BoneMatrixRecord>(bone_count)?;
        let offsets = reader.read_slice::<BoneDataRecord>(bone_count)?;
        matrices
            .iter()
            .zip(offsets)
            .map(|(m, d)| Bone {
                bind_matrix: floats(&m.matrix),
                parent_packed: m.parent.get(),
                offset: floats(&d.offset),
            })
            .collect()
    } else {
        Vec::new()
    };

    let animation_count = header.animation_count.get() as usize;
    let animations = if animation_count > 0 {
        BeReader::new_at(data, at(&header.animation_table_offset))
            .read_slice::<U32>(animation_count)?
            .iter()
            .map(|clip| match clip.get() {
                0 => Ok(AnimationClip::default()),
                relative => read_clip(data, pointer.wrapping_add(relative)),
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(Mesh {
        id: u32::from(header.id.get()),
        size: header.size.get(),
        vertices,
        indices,
        texture_runs,
        skin,
        bones,
        animations,
    })
}

/// Decode a table of `count` mesh pointers (tie and shrub models).
pub fn read_mesh_table(data: &[u8], entry: SectionEntry) -> Result<Vec<Mesh>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    BeReader::new_at(data, entry.pointer as usize)
        .read_slice::<U32>(entry.count as usize)?
        .iter()
        .filter(|p| p.get() != 0)
        .map(|p| read_mesh(data, p.get()))
        .collect()
}

fn read_entries(data: &[u8], entries: &[ModelEntryRecord]) -> Result<Vec<Mesh>> {
    entries
        .iter()
        .filter(|e| e.pointer.get() != 0)
        .map(|e| -> Result<Mesh> {
            let mut mesh = read_mesh(data, e.pointer.get())?;
            mesh.id = e.id.get();
            Ok(mesh)
        })
        .collect()
}

/// Decode the moby model table: an inline count, then `{id, pointer}`
/// pairs. The table id wins over the record id.
pub fn read_moby_models(data: &[u8], pointer: u32) -> Result<Vec<Mesh>> {
    if pointer == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BeReader::new_at(data, pointer as usize);
    let count = reader.read_u32()? as usize;
    read_entries(data, reader.read_slice::<ModelEntryRecord>(count)?)
}

/// Decode the gadget table: `count` `{id, pointer}` pairs.
pub fn read_gadget_models(data: &[u8], entry: SectionEntry) -> Result<Vec<Mesh>> {
    if entry.pointer == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BeReader::new_at(data, entry.pointer as usize);
    read_entries(data, reader.read_slice::<ModelEntryRecord>(entry.count as usize)?)
}

/// Decode the skybox, a single mesh record.
pub fn read_skybox(data: &[u8], pointer: u32) -> Result<Option<Mesh>> {
    if pointer == 0 {
        return Ok(None);
    }
    read_mesh(data, pointer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ContainerBuilder, MeshSpec};
    use crate::{Error, GameType};

    fn triangle_mesh() -> MeshSpec {
        MeshSpec {
            id: 0x42,
            size: 2.0,
            runs: vec![(-1, 0), (3, 3)],
            vertices: vec![
                [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0],
                [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            ],
            indices: vec![0, 1, 2, 2, 1, 0],
            ..Default::default()
        }
    }

    #[test]
    fn test_read_mesh() {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let p = builder.push_mesh(&triangle_mesh());
        let data = builder.finish();

        let mesh = read_mesh(&data, p).unwrap();
        assert_eq!(mesh.id, 0x42);
        assert_eq!(mesh.size, 2.0);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(
            mesh.texture_runs,
            vec![
                TextureRun { texture_id: -1, start: 0 },
                TextureRun { texture_id: 3, start: 3 }
            ]
        );
        assert!(mesh.skin.is_none());
        assert!(mesh.bones.is_empty());
        assert!(mesh.animations.is_empty());
    }

    #[test]
    fn test_skin_only_with_flag() {
        let mut spec = triangle_mesh();
        spec.skin = Some(vec![(0x0001_0203, 0xFF00_0000); 3]);
        let mut builder = ContainerBuilder::new(GameType::Rc3);
        let p = builder.push_mesh(&spec);
        let data = builder.finish();

        let skin = read_mesh(&data, p).unwrap().skin.unwrap();
        assert_eq!(skin.len(), 3);
        assert_eq!(skin[0].bones(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_skeleton_and_clips() {
        let mut builder = ContainerBuilder::new(GameType::Rc2);
        let clip = builder.push_clip(1.0, &[(vec![[0, 0, 0, 32767]; 2], vec![])]);
        let mut spec = triangle_mesh();
        spec.bones = vec![
            ([1.0; 16], 0, [0.0, 0.0, 0.0, 0.0]),
            ([2.0; 16], 0x40, [1024.0, 0.0, 0.0, 0.0]),
        ];
        spec.clips = vec![clip, 0];
        let p = builder.push_mesh(&spec);
        let data = builder.finish();

        let mesh = read_mesh(&data, p).unwrap();
        assert_eq!(mesh.bones.len(), 2);
        assert_eq!(mesh.bones[1].parent(), 1);
        assert_eq!(mesh.bones[1].bind_matrix, [2.0; 16]);
        assert_eq!(mesh.bones[1].rest_translation(), [1.0, 0.0, 0.0]);
        assert_eq!(mesh.animations.len(), 2);
        assert_eq!(mesh.animations[0].frames[0].rotations.len(), 2);
        assert!(mesh.animations[1].is_empty());
    }

    #[test]
    fn test_moby_table_id_overrides() {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let mesh = builder.push_mesh(&triangle_mesh());
        let table = builder.push_u32(2);
        builder.push_u32(0x1234);
        builder.push_u32(mesh);
        builder.push_u32(0x99);
        builder.push_u32(0);
        let data = builder.finish();

        let models = read_moby_models(&data, table).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, 0x1234);
    }

    #[test]
    fn test_mesh_table_and_gadgets() {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let a = builder.push_mesh(&MeshSpec::with_vertices(1, 4));
        let b = builder.push_mesh(&MeshSpec::with_vertices(2, 5));
        let ties = builder.push_u32(a);
        builder.push_u32(b);
        let gadgets = builder.push_u32(7);
        builder.push_u32(b);
        let data = builder.finish();

        let models = read_mesh_table(&data, SectionEntry { pointer: ties, count: 2 }).unwrap();
        assert_eq!(models.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(models[1].vertices.len(), 5);

        let gadgets = read_gadget_models(&data, SectionEntry { pointer: gadgets, count: 1 }).unwrap();
        assert_eq!(gadgets[0].id, 7);
    }

    #[test]
    fn test_zero_table_entries_are_skipped() {
        let mut builder = ContainerBuilder::new(GameType::Rc2);
        let a = builder.push_mesh(&MeshSpec::with_vertices(3, 3));
        let ties = builder.push_u32(0);
        builder.push_u32(a);
        builder.push_u32(0);
        let gadgets = builder.push_u32(9);
        builder.push_u32(0);
        builder.push_u32(4);
        builder.push_u32(a);
        let data = builder.finish();

        let models = read_mesh_table(&data, SectionEntry { pointer: ties, count: 3 }).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, 3);

        let gadgets = read_gadget_models(&data, SectionEntry { pointer: gadgets, count: 2 }).unwrap();
        assert_eq!(gadgets.len(), 1);
        assert_eq!(gadgets[0].id, 4);
    }

    #[test]
    fn test_absent_tables_are_empty() {
        let data = ContainerBuilder::new(GameType::Deadlocked).finish();
        assert!(read_mesh_table(&data, SectionEntry::default()).unwrap().is_empty());
        assert!(read_moby_models(&data, 0).unwrap().is_empty());
        assert!(read_gadget_models(&data, SectionEntry::default()).unwrap().is_empty());
        assert!(read_skybox(&data, 0).unwrap().is_none());
    }

    #[test]
    fn test_mesh_past_end_fails() {
        let data = ContainerBuilder::new(GameType::Rc1).finish();
        assert!(matches!(read_mesh(&data, 0x70), Err(Error::Common(_))));
    }
}
