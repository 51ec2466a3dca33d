use lombax_common::BeReader;

use crate::records::{floats, FragmentRecord, TerrainChunkRecord};
use crate::{Result, TerrainChunk, TerrainFragment};

use super::read_mesh;

/// Decode the terrain: a fixed array of chunk headers, each pointing at a
/// fragment table. Absent terrain yields no chunks; a present one always
/// yields [`TerrainChunk::MAX`] of them, possibly empty.
pub fn read_terrain(data: &[u8], pointer: u32) -> Result<Vec<TerrainChunk>> {
    if pointer == 0 {
        return Ok(Vec::new());
    }

    let chunks = BeReader::new_at(data, pointer as usize)
        .read_slice::<TerrainChunkRecord>(TerrainChunk::MAX)?;

    chunks
        .iter()
        .map(|chunk| -> Result<TerrainChunk> {
            if chunk.fragments.get() == 0 {
                return Ok(TerrainChunk::default());
            }
            let records = BeReader::new_at(data, chunk.fragments.get() as usize)
                .read_slice::<FragmentRecord>(chunk.fragment_count.get() as usize)?;
            let fragments = records
                .iter()
                .filter(|f| f.mesh.get() != 0)
                .map(|f| -> Result<TerrainFragment> {
                    Ok(TerrainFragment {
                        cull_center: floats(&f.cull_center),
                        cull_radius: f.cull_radius.get(),
                        mesh: read_mesh(data, f.mesh.get())?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TerrainChunk { fragments })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ContainerBuilder, MeshSpec};
    use crate::GameType;

    #[test]
    fn test_read_terrain() {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let mesh = builder.push_mesh(&MeshSpec::with_vertices(0, 3));
        let fragments = builder.push_f32s(&[1.0, 2.0, 3.0, 50.0]);
        builder.push_u32(mesh);
        builder.push_u32(0);
        builder.push_f32s(&[0.0; 4]);
        builder.push_u32(mesh);
        builder.push_u32(0);

        let terrain = builder.here();
        builder.push_u32(0);
        builder.push_u32(0);
        builder.push_u32(fragments);
        builder.push_u32(2);
        builder.push_bytes(&[0; 24]);
        let data = builder.finish();

        let chunks = read_terrain(&data, terrain).unwrap();
        assert_eq!(chunks.len(), TerrainChunk::MAX);
        assert!(chunks[0].fragments.is_empty());
        assert_eq!(chunks[1].fragments.len(), 2);
        assert_eq!(chunks[1].fragments[0].cull_center, [1.0, 2.0, 3.0]);
        assert_eq!(chunks[1].fragments[0].cull_radius, 50.0);
        assert_eq!(chunks[1].fragments[1].mesh.vertices.len(), 3);
        assert!(read_terrain(&data, 0).unwrap().is_empty());
    }

    #[test]
    fn test_zero_inner_pointers_are_skipped() {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let mesh = builder.push_mesh(&MeshSpec::with_vertices(7, 3));
        let fragments = builder.push_f32s(&[0.0; 4]);
        builder.push_u32(0);
        builder.push_u32(0);
        builder.push_f32s(&[4.0, 5.0, 6.0, 1.0]);
        builder.push_u32(mesh);
        builder.push_u32(0);

        let terrain = builder.here();
        builder.push_u32(0);
        builder.push_u32(3);
        builder.push_u32(fragments);
        builder.push_u32(2);
        builder.push_bytes(&[0; 24]);
        let data = builder.finish();

        let chunks = read_terrain(&data, terrain).unwrap();
        assert!(chunks[0].fragments.is_empty());
        assert_eq!(chunks[1].fragments.len(), 1);
        assert_eq!(chunks[1].fragments[0].cull_center, [4.0, 5.0, 6.0]);
        assert_eq!(chunks[1].fragments[0].mesh.id, 7);
        assert!(chunks[1].fragments[0].mesh.skin.is_none());
    }
}
