//! Inter-Quake Export output for skinned meshes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lombax_engine::{dequantize, AnimationClip, Mesh};

use crate::images::TextureSideChannel;
use crate::material::texture_file_name;
use crate::Result;

/// Write the skeleton, geometry and animations of `mesh` as IQE.
///
/// Bind pose translations come from the bones' auxiliary offsets. Clips
/// without frames are skipped without using up an animation number, and
/// frames without rotations are skipped.
pub fn encode_iqe<W: Write>(out: &mut W, mesh: &Mesh, clips: &[AnimationClip]) -> Result<()> {
    writeln!(out, "# Inter-Quake Export")?;

    for (i, bone) in mesh.bones.iter().enumerate() {
        match bone.parent() {
            0 => writeln!(out, "joint h{i}")?,
            parent => writeln!(out, "joint h{i} {parent}")?,
        }
        let [x, y, z] = bone.rest_translation();
        writeln!(out, "pq {x} {y} {z}")?;
    }

    for span in mesh.run_spans() {
        if span.is_textured() {
            writeln!(out, "mesh {}", span.texture_id)?;
            writeln!(out, "material {}", texture_file_name(span.texture_id))?;
        }
        for tri in mesh.indices[span.indices].chunks_exact(3) {
            writeln!(out, "fm {} {} {}", tri[0], tri[1], tri[2])?;
        }
    }

    for (i, v) in mesh.vertices.iter().enumerate() {
        writeln!(out, "vp {} {} {}", v.position[0], v.position[1], v.position[2])?;
        writeln!(out, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
        writeln!(out, "vt {} {}", v.uv[0], v.uv[1])?;

        if let Some(skin) = mesh.skin.as_ref().and_then(|s| s.get(i)) {
            let bones = skin.bones();
            let weights = skin.normalized_weights();
            write!(out, "vb")?;
            for (bone, weight) in bones.iter().zip(weights) {
                write!(out, " {bone} {weight}")?;
            }
            writeln!(out)?;
        }
    }

    let clips = clips.iter().filter(|c| !c.is_empty());
    for (index, clip) in clips.enumerate() {
        writeln!(out, "animation {index}")?;
        writeln!(out, "framerate {}", clip.framerate())?;

        for (k, frame) in clip.frames.iter().enumerate() {
            if frame.is_empty() {
                continue;
            }
            writeln!(out, "frame {k}")?;
            for (rotation, bone) in frame.rotations.iter().zip(&mesh.bones) {
                let [x, y, z] = bone.rest_translation();
                let [qx, qy, qz, qw] = dequantize(*rotation);
                writeln!(out, "pq {x} {y} {z} {qx} {qy} {qz} {}", -qw)?;
            }
        }
    }

    Ok(())
}

/// Write `mesh` to an `.iqe` file, plus its texture images when given.
pub fn write_mesh_iqe(
    mesh: &Mesh,
    clips: &[AnimationClip],
    output: &Path,
    textures: Option<&TextureSideChannel<'_>>,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(output)?);
    encode_iqe(&mut out, mesh, clips)?;
    out.flush()?;

    if let Some(textures) = textures {
        textures.write_for_mesh(mesh, output);
    }

    tracing::debug!(path = %output.display(), mesh = mesh.id, bones = mesh.bones.len(), "wrote iqe");
    Ok(())
}
