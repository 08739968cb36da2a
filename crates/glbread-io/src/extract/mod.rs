//! Per-entity extractors.
//!
//! Each extractor reads the immediate members of one JSON object, exact
//! matching the keys it knows and skipping the rest, and leaves the cursor
//! just past the object. It builds its record locally and writes it to the
//! [`Target`] only once the whole object has been read, so a failing
//! extractor never leaves a half-filled record behind.

mod accessor;
mod buffer;
mod material;
mod mesh;
mod node;

pub use accessor::extract_accessor;
pub use buffer::{extract_buffer, extract_buffer_view};
pub use material::{extract_image, extract_material, Image, Material, TextureRef};
pub use mesh::{extract_mesh, extract_primitive};
pub use node::{extract_node, extract_scene, Node, Scene};

use glbread_core::{Result, TokenCursor};

/// Where an extractor puts what it reads.
#[derive(Debug)]
pub enum Target<'a, T> {
    Record(&'a mut T),
    /// Walk and validate the object, write nothing.
    DryRun,
}

impl<'a, T> Target<'a, T> {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Target::DryRun)
    }

    fn commit(self, value: T) {
        if let Target::Record(slot) = self {
            *slot = value;
        }
    }
}

/// Extracts every element of the array at the cursor into a list allocated
/// once from the array's element count.
pub fn extract_array<'a, T, F>(cursor: &mut TokenCursor<'a>, mut extract: F) -> Result<Vec<T>>
where
    T: Default + Clone,
    F: FnMut(&mut TokenCursor<'a>, Target<'_, T>) -> Result<()>,
{
    let len = cursor.expect_array()? as usize;
    let mut records = vec![T::default(); len];
    for record in records.iter_mut() {
        extract(cursor, Target::Record(record))?;
    }
    Ok(records)
}

/// Dry-runs `extract` over every element of the array at the cursor and
/// returns the element count.
pub fn walk_entities<'a, T, F>(cursor: &mut TokenCursor<'a>, mut extract: F) -> Result<u32>
where
    F: FnMut(&mut TokenCursor<'a>, Target<'_, T>) -> Result<()>,
{
    cursor.walk_array(|cursor, _| extract(cursor, Target::DryRun))
}

/// Reads an array of indices. Values are validated either way but only
/// collected when `keep` is set.
fn read_indices(cursor: &mut TokenCursor<'_>, keep: bool) -> Result<Vec<u32>> {
    let mut indices = Vec::new();
    cursor.walk_array(|cursor, _| {
        let index = cursor.read_integer::<u32>()?;
        if keep {
            indices.push(index);
        }
        Ok(())
    })?;
    Ok(indices)
}
