//! Wavefront OBJ output.
//!
//! Levels are written in a single sequential pass. OBJ vertex indices are
//! global to the file, so the encoder carries a running vertex count and
//! rebases every mesh's local indices onto it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lombax_engine::{Category, Level, Mesh};

use crate::images::TextureSideChannel;
use crate::material::{material_name, MaterialLibrary};
use crate::settings::{CompositionMode, LevelExportSettings};
use crate::transform::VertexTransform;
use crate::{Error, Result};

/// What an export wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    pub objects: usize,
    pub vertices: usize,
    pub faces: usize,
    pub materials: usize,
}

/// Streaming OBJ writer.
pub struct ObjEncoder<W: Write> {
    out: W,
    /// Vertices written so far; the base of the next mesh's indices.
    vertex_base: usize,
    materials: MaterialLibrary,
    summary: ExportSummary,
}

impl<W: Write> ObjEncoder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            vertex_base: 0,
            materials: MaterialLibrary::new(),
            summary: ExportSummary::default(),
        }
    }

    /// Reference a material library.
    pub fn write_mtllib(&mut self, file_name: &str) -> Result<()> {
        writeln!(self.out, "mtllib {file_name}")?;
        Ok(())
    }

    /// Start a new named object.
    pub fn begin_object(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "o {name}")?;
        self.summary.objects += 1;
        Ok(())
    }

    /// Write a mesh's vertices and faces, returning the vertex count.
    ///
    /// Each texture run opens with `usemtl`/`g` lines; untextured runs get
    /// no marker but their faces are still written.
    pub fn write_mesh(&mut self, mesh: &Mesh, transform: &VertexTransform) -> Result<usize> {
        for v in &mesh.vertices {
            let p = transform.apply(v.position);
            writeln!(self.out, "v {} {} {}", p.x, p.y, p.z)?;
            writeln!(self.out, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
            writeln!(self.out, "vt {} {}", v.uv[0], 1.0 - v.uv[1])?;
        }

        for span in mesh.run_spans() {
            if span.is_textured() {
                self.materials.add(span.texture_id);
                writeln!(self.out, "usemtl {}", material_name(span.texture_id))?;
                writeln!(self.out, "g Texture_{}", span.texture_id)?;
            }
            for tri in mesh.indices[span.indices].chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| usize::from(i) + 1 + self.vertex_base);
                writeln!(self.out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
                self.summary.faces += 1;
            }
        }

        let count = mesh.vertices.len();
        self.vertex_base += count;
        self.summary.vertices += count;
        Ok(count)
    }

    /// Flush and hand back the writer with what was written.
    pub fn finish(mut self) -> Result<(W, MaterialLibrary, ExportSummary)> {
        self.out.flush()?;
        let summary = ExportSummary {
            materials: self.materials.len(),
            ..self.summary
        };
        Ok((self.out, self.materials, summary))
    }
}

/// Object name of a mesh, `Object_XXXX`.
pub fn object_name(mesh: &Mesh) -> String {
    format!("Object_{:04X}", mesh.id)
}

fn mtl_file_name(output: &Path) -> String {
    output
        .with_extension("mtl")
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "materials.mtl".to_string())
}

fn write_mtl_file(path: &Path, materials: &MaterialLibrary) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    materials.write_mtl(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Export a level to `output` (and a sibling `.mtl`).
///
/// Terrain (selected chunks, untransformed) comes first, then ties, shrubs
/// and mobies, each placed by its instance transform. Unsupported modes
/// fail before any file is created.
pub fn write_level_obj(level: &Level, output: &Path, settings: &LevelExportSettings) -> Result<ExportSummary> {
    let separate = match settings.mode {
        CompositionMode::Combined => false,
        CompositionMode::Separate => true,
        mode => return Err(Error::UnsupportedCompositionMode(mode)),
    };

    let mut encoder = ObjEncoder::new(BufWriter::new(File::create(output)?));
    if settings.export_material_file {
        encoder.write_mtllib(&mtl_file_name(output))?;
    }
    if !separate {
        encoder.begin_object("Object_CombinedLevel")?;
    }

    let terrain = level
        .terrain
        .iter()
        .enumerate()
        .filter(|(i, _)| settings.chunk_selected(*i))
        .flat_map(|(_, chunk)| &chunk.fragments);
    for fragment in terrain {
        if separate {
            encoder.begin_object(&object_name(&fragment.mesh))?;
        }
        encoder.write_mesh(&fragment.mesh, &VertexTransform::Identity)?;
    }

    for category in Category::ALL {
        if !settings.writes(category) {
            continue;
        }
        for instance in level.instances(category) {
            let Some(mesh) = level.instance_mesh(category, instance) else {
                tracing::warn!(%category, model = instance.model, "instance has no model");
                continue;
            };
            if separate {
                encoder.begin_object(&object_name(mesh))?;
            }
            encoder.write_mesh(mesh, &VertexTransform::placed(mesh.size, instance))?;
        }
    }

    let (_, materials, summary) = encoder.finish()?;
    if settings.export_material_file {
        write_mtl_file(&output.with_extension("mtl"), &materials)?;
    }

    tracing::debug!(
        path = %output.display(),
        mode = %settings.mode,
        objects = summary.objects,
        vertices = summary.vertices,
        "wrote level"
    );
    Ok(summary)
}

/// Export a single mesh as stored, with its own `.mtl` and, when given,
/// its texture images.
pub fn write_mesh_obj(
    mesh: &Mesh,
    output: &Path,
    textures: Option<&TextureSideChannel<'_>>,
) -> Result<ExportSummary> {
    let mut encoder = ObjEncoder::new(BufWriter::new(File::create(output)?));
    encoder.begin_object(&object_name(mesh))?;
    encoder.write_mtllib(&mtl_file_name(output))?;
    encoder.write_mesh(mesh, &VertexTransform::Identity)?;

    let (_, materials, summary) = encoder.finish()?;
    write_mtl_file(&output.with_extension("mtl"), &materials)?;

    if let Some(textures) = textures {
        textures.write_for_mesh(mesh, output);
    }
    Ok(summary)
}
