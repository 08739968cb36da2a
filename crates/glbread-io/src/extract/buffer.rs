use glbread_core::{BufferViewTarget, Result, TokenCursor};

use super::Target;
use crate::document::{Buffer, BufferView};

/// Reads one `buffers[]` entry. Only `byteLength` is kept; a GLB buffer
/// lives in the BIN chunk so `uri` is skipped.
pub fn extract_buffer(cursor: &mut TokenCursor<'_>, target: Target<'_, Buffer>) -> Result<()> {
    let mut buffer = Buffer::default();
    cursor.walk_object(|cursor, key| {
        if key != b"byteLength" {
            return Ok(false);
        }
        buffer.byte_length = cursor.read_integer()?;
        Ok(true)
    })?;
    target.commit(buffer);
    Ok(())
}

/// Reads one `bufferViews[]` entry.
pub fn extract_buffer_view(cursor: &mut TokenCursor<'_>, target: Target<'_, BufferView>) -> Result<()> {
    let mut view = BufferView::default();
    cursor.walk_object(|cursor, key| {
        match key {
            b"buffer" => view.buffer = cursor.read_integer()?,
            b"byteLength" => view.byte_length = cursor.read_integer()?,
            b"byteOffset" => view.byte_offset = cursor.read_integer()?,
            b"byteStride" => view.byte_stride = Some(cursor.read_integer()?),
            b"target" => view.target = Some(BufferViewTarget::from_code(cursor.read_integer()?)),
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    target.commit(view);
    Ok(())
}
