use glbread_core::{Result, TokenCursor};

use super::{read_indices, Target};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub mesh: Option<u32>,
    pub children: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    pub nodes: Vec<u32>,
}

/// Reads one `nodes[]` entry. Transforms are skipped.
pub fn extract_node(cursor: &mut TokenCursor<'_>, target: Target<'_, Node>) -> Result<()> {
    let keep = !target.is_dry_run();
    let mut node = Node::default();
    cursor.walk_object(|cursor, key| {
        match key {
            b"mesh" => node.mesh = Some(cursor.read_integer()?),
            b"children" => node.children = read_indices(cursor, keep)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    target.commit(node);
    Ok(())
}

/// Reads one `scenes[]` entry.
pub fn extract_scene(cursor: &mut TokenCursor<'_>, target: Target<'_, Scene>) -> Result<()> {
    let keep = !target.is_dry_run();
    let mut scene = Scene::default();
    cursor.walk_object(|cursor, key| {
        if key != b"nodes" {
            return Ok(false);
        }
        scene.nodes = read_indices(cursor, keep)?;
        Ok(true)
    })?;
    target.commit(scene);
    Ok(())
}
