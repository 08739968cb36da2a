use glbread_core::{ComponentType, ElementType, Result, TokenCursor};
use log::warn;

use super::Target;
use crate::document::Accessor;

/// Reads one `accessors[]` entry. `min`, `max`, `sparse` and the rest are
/// skipped. Unknown component codes and type names decode to `Undefined`.
pub fn extract_accessor(cursor: &mut TokenCursor<'_>, target: Target<'_, Accessor>) -> Result<()> {
    let offset = cursor.offset();
    let mut accessor = Accessor::default();

    cursor.walk_object(|cursor, key| {
        match key {
            b"bufferView" => accessor.buffer_view = cursor.read_integer()?,
            b"byteOffset" => accessor.byte_offset = cursor.read_integer()?,
            b"componentType" => {
                accessor.component_type = ComponentType::from_code(cursor.read_integer()?)
            }
            b"type" => accessor.element_type = ElementType::from_name(cursor.read_string()?),
            b"count" => accessor.count = cursor.read_integer()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    if accessor.component_type == ComponentType::Undefined {
        warn!("accessor at byte {} has an undefined componentType", offset);
    }
    if accessor.element_type == ElementType::Undefined {
        warn!("accessor at byte {} has an undefined type", offset);
    }

    target.commit(accessor);
    Ok(())
}
