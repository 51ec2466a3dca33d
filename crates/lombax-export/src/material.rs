//! Material bookkeeping for OBJ output.

use std::hash::BuildHasherDefault;
use std::io::Write;

use hashbrown::HashSet;
use rustc_hash::FxHasher;

use crate::Result;

/// Material name of a texture id.
pub fn material_name(texture_id: i32) -> String {
    format!("mtl_{texture_id}")
}

/// Image file name of a texture id, `<hex id>.png`.
pub fn texture_file_name(texture_id: i32) -> String {
    format!("{texture_id:x}.png")
}

/// Distinct texture ids in the order they were first seen.
#[derive(Debug, Default, Clone)]
pub struct MaterialLibrary {
    seen: HashSet<i32, BuildHasherDefault<FxHasher>>,
    order: Vec<i32>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a texture id. Untextured ids are ignored.
    pub fn add(&mut self, texture_id: i32) -> bool {
        if texture_id < 0 || !self.seen.insert(texture_id) {
            return false;
        }
        self.order.push(texture_id);
        true
    }

    /// Texture ids in first-seen order.
    pub fn texture_ids(&self) -> &[i32] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Write one `newmtl` block per texture.
    pub fn write_mtl<W: Write>(&self, out: &mut W) -> Result<()> {
        for &id in &self.order {
            writeln!(out, "newmtl {}", material_name(id))?;
            writeln!(out, "Ns 1000")?;
            writeln!(out, "Ka 1.000000 1.000000 1.000000")?;
            writeln!(out, "Kd 1.000000 1.000000 1.000000")?;
            writeln!(out, "Ni 1.000000")?;
            writeln!(out, "d 1.000000")?;
            writeln!(out, "illum 1")?;
            writeln!(out, "map_Kd {}", texture_file_name(id))?;
        }
        Ok(())
    }
}
