//! Cross-reference and byte range checks on an extracted document.

use glbread_core::SchemaError;

use crate::document::SceneDocument;

fn check_index(what: &'static str, index: u32, len: usize) -> Result<(), SchemaError> {
    if index as usize >= len {
        return Err(SchemaError::IndexOutOfRange { what, index, len });
    }
    Ok(())
}

/// Checks every index a document holds against the list it points into, and
/// every buffer view against the buffer's byte length.
pub fn validate_references(document: &SceneDocument) -> Result<(), SchemaError> {
    let buffer_len = u64::from(document.buffer.byte_length);
    for view in &document.buffer_views {
        check_index("buffer", view.buffer, 1)?;
        if view.end() > buffer_len {
            return Err(SchemaError::RangeOutOfBounds {
                what: "buffer view",
                start: u64::from(view.byte_offset),
                end: view.end(),
                len: buffer_len,
            });
        }
    }

    for accessor in &document.accessors {
        check_index("buffer view", accessor.buffer_view, document.buffer_views.len())?;
    }

    let accessor_count = document.accessors.len();
    for primitive in document.meshes.iter().flat_map(|mesh| &mesh.primitives) {
        check_index("accessor", primitive.pos_accessor, accessor_count)?;
        for index in [primitive.nrm_accessor, primitive.idx_accessor]
            .into_iter()
            .flatten()
        {
            check_index("accessor", index, accessor_count)?;
        }
        if let Some(material) = primitive.material {
            check_index("material", material, document.material_count)?;
        }
    }
    Ok(())
}

/// Checks that the declared buffer fits inside the BIN chunk.
pub fn validate_buffer(document: &SceneDocument, bin_len: usize) -> Result<(), SchemaError> {
    let declared = u64::from(document.buffer.byte_length);
    if declared > bin_len as u64 {
        return Err(SchemaError::RangeOutOfBounds {
            what: "buffer",
            start: 0,
            end: declared,
            len: bin_len as u64,
        });
    }
    Ok(())
}
