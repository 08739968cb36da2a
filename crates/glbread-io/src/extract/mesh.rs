use glbread_core::{PrimitiveMode, Result, SchemaError, TokenCursor};

use super::{extract_array, walk_entities, Target};
use crate::document::{Mesh, MeshPrimitive};

/// Reads one `meshes[]` entry. In a dry run the primitives are still walked
/// and validated, but not collected.
pub fn extract_mesh(cursor: &mut TokenCursor<'_>, target: Target<'_, Mesh>) -> Result<()> {
    let dry_run = target.is_dry_run();
    let mut mesh = Mesh::default();
    cursor.walk_object(|cursor, key| {
        if key != b"primitives" {
            return Ok(false);
        }
        if dry_run {
            walk_entities(cursor, extract_primitive)?;
        } else {
            mesh.primitives = extract_array(cursor, extract_primitive)?;
        }
        Ok(true)
    })?;
    target.commit(mesh);
    Ok(())
}

/// Reads one `primitives[]` entry. `attributes.POSITION` is required;
/// attributes other than POSITION and NORMAL are skipped.
pub fn extract_primitive(cursor: &mut TokenCursor<'_>, target: Target<'_, MeshPrimitive>) -> Result<()> {
    let offset = cursor.offset();
    let mut primitive = MeshPrimitive::default();
    let mut position = None;

    cursor.walk_object(|cursor, key| {
        match key {
            b"attributes" => cursor.walk_object(|cursor, attribute| {
                match attribute {
                    b"POSITION" => position = Some(cursor.read_integer()?),
                    b"NORMAL" => primitive.nrm_accessor = Some(cursor.read_integer()?),
                    _ => return Ok(false),
                }
                Ok(true)
            })?,
            b"indices" => primitive.idx_accessor = Some(cursor.read_integer()?),
            b"material" => primitive.material = Some(cursor.read_integer()?),
            b"mode" => primitive.mode = PrimitiveMode::from_code(cursor.read_integer()?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    primitive.pos_accessor = position.ok_or(SchemaError::MissingPosition { offset })?;
    target.commit(primitive);
    Ok(())
}
