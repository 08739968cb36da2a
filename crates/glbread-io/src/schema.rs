//! Top-level section dispatch.

use glbread_core::{GlbError, Result, SchemaError, Token, TokenCursor, TokenKind};
use log::{debug, trace};

use crate::document::{Buffer, SceneDocument};
use crate::extract::{
    extract_accessor, extract_array, extract_buffer, extract_buffer_view, extract_image,
    extract_material, extract_mesh, extract_node, extract_scene, walk_entities,
};

/// Walks the token stream of a whole document and extracts the sections a
/// renderer needs. `tokens` must come from tokenizing `json`.
///
/// The root must be an object. `images`, `materials`, `nodes` and `scenes`
/// are dry-run, `scene` must be a scalar, and every other root member is
/// skipped whatever its shape. Exactly one buffer must be declared.
pub fn parse_document(tokens: &[Token], json: &[u8]) -> Result<SceneDocument> {
    let mut cursor = TokenCursor::new(tokens, json);
    if cursor
        .peek()
        .map_or(false, |root| root.kind != TokenKind::Object)
    {
        return Err(SchemaError::RootNotObject.into());
    }

    let mut document = SceneDocument::default();
    let mut buffers: Option<Vec<Buffer>> = None;
    let mut skipped = 0usize;

    cursor.walk_object(|cursor, key| {
        trace!(
            "section {:?} at token {}",
            String::from_utf8_lossy(key),
            cursor.position()
        );
        match key {
            b"accessors" => document.accessors = extract_array(cursor, extract_accessor)?,
            b"bufferViews" => document.buffer_views = extract_array(cursor, extract_buffer_view)?,
            b"buffers" => buffers = Some(extract_array(cursor, extract_buffer)?),
            b"meshes" => document.meshes = extract_array(cursor, extract_mesh)?,
            b"materials" => {
                document.material_count = walk_entities(cursor, extract_material)? as usize
            }
            b"images" => {
                walk_entities(cursor, extract_image)?;
            }
            b"nodes" => {
                walk_entities(cursor, extract_node)?;
            }
            b"scenes" => {
                walk_entities(cursor, extract_scene)?;
            }
            b"scene" => {
                cursor.expect_kind(TokenKind::Primitive)?;
            }
            _ => {
                skipped += 1;
                return Ok(false);
            }
        }
        Ok(true)
    })?;

    if !cursor.is_at_end() {
        return Err(GlbError::overrun(
            cursor.offset(),
            "tokens remain after the root object",
        ));
    }

    document.buffer = match buffers.as_deref() {
        Some([buffer]) => *buffer,
        None | Some([]) => return Err(SchemaError::MissingBuffer.into()),
        Some(all) => return Err(SchemaError::MultipleBuffers { count: all.len() }.into()),
    };

    debug!(
        "extracted {} accessors, {} buffer views, {} meshes ({} primitives), {} materials; {} sections skipped",
        document.accessor_count(),
        document.buffer_view_count(),
        document.meshes.len(),
        document.primitive_count(),
        document.material_count,
        skipped
    );
    Ok(document)
}
