//! Material and image walkers.
//!
//! The schema walker only dry-runs these to step over the sections, but the
//! texture references they understand are still validated on the way.

use glbread_core::{Result, TokenCursor};

use super::Target;

/// `{ "index": n, "texCoord": m }`, as used by every material texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureRef {
    pub index: u32,
    pub tex_coord: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Material {
    pub base_color_texture: Option<TextureRef>,
    pub metallic_roughness_texture: Option<TextureRef>,
    pub normal_texture: Option<TextureRef>,
    pub occlusion_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Image {
    pub buffer_view: Option<u32>,
}

fn read_texture_ref(cursor: &mut TokenCursor<'_>) -> Result<TextureRef> {
    let mut texture = TextureRef::default();
    cursor.walk_object(|cursor, key| {
        match key {
            b"index" => texture.index = cursor.read_integer()?,
            b"texCoord" => texture.tex_coord = cursor.read_integer()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    Ok(texture)
}

/// Reads one `materials[]` entry. Factors, names and extensions are skipped.
pub fn extract_material(cursor: &mut TokenCursor<'_>, target: Target<'_, Material>) -> Result<()> {
    let mut material = Material::default();
    cursor.walk_object(|cursor, key| {
        match key {
            b"pbrMetallicRoughness" => cursor.walk_object(|cursor, key| {
                match key {
                    b"baseColorTexture" => {
                        material.base_color_texture = Some(read_texture_ref(cursor)?)
                    }
                    b"metallicRoughnessTexture" => {
                        material.metallic_roughness_texture = Some(read_texture_ref(cursor)?)
                    }
                    _ => return Ok(false),
                }
                Ok(true)
            })?,
            b"normalTexture" => material.normal_texture = Some(read_texture_ref(cursor)?),
            b"occlusionTexture" => material.occlusion_texture = Some(read_texture_ref(cursor)?),
            b"emissiveTexture" => material.emissive_texture = Some(read_texture_ref(cursor)?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    target.commit(material);
    Ok(())
}

/// Reads one `images[]` entry. Only an embedded `bufferView` is kept.
pub fn extract_image(cursor: &mut TokenCursor<'_>, target: Target<'_, Image>) -> Result<()> {
    let mut image = Image::default();
    cursor.walk_object(|cursor, key| {
        if key != b"bufferView" {
            return Ok(false);
        }
        image.buffer_view = Some(cursor.read_integer()?);
        Ok(true)
    })?;
    target.commit(image);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbread_core::{tokenize, GlbError};

    #[test]
    fn test_material_textures() {
        let json = br#"{"name":"lamp","pbrMetallicRoughness":{"baseColorFactor":[1,0.5,0.5,1],"baseColorTexture":{"index":0,"texCoord":1},"metallicFactor":0,"metallicRoughnessTexture":{"index":2}},"normalTexture":{"scale":0.8,"index":1},"emissiveFactor":[0,0,0],"doubleSided":true}"#;
        let tokens = tokenize(json).unwrap();
        let mut cursor = TokenCursor::new(&tokens, json);
        let mut material = Material::default();
        extract_material(&mut cursor, Target::Record(&mut material)).unwrap();
        assert!(cursor.is_at_end());
        assert_eq!(
            material,
            Material {
                base_color_texture: Some(TextureRef {
                    index: 0,
                    tex_coord: 1
                }),
                metallic_roughness_texture: Some(TextureRef {
                    index: 2,
                    tex_coord: 0
                }),
                normal_texture: Some(TextureRef {
                    index: 1,
                    tex_coord: 0
                }),
                occlusion_texture: None,
                emissive_texture: None,
            }
        );
    }

    #[test]
    fn test_material_key_order_independent() {
        let json = br#"{"pbrMetallicRoughness":{"metallicFactor":0,"baseColorTexture":{"texCoord":1,"index":4}},"name":"m"}"#;
        let tokens = tokenize(json).unwrap();
        let mut cursor = TokenCursor::new(&tokens, json);
        let mut material = Material::default();
        extract_material(&mut cursor, Target::Record(&mut material)).unwrap();
        assert!(cursor.is_at_end());
        assert_eq!(material.base_color_texture.map(|t| t.index), Some(4));
    }

    #[test]
    fn test_material_dry_run_validates_index() {
        let json = br#"{"occlusionTexture":{"index":"0"}}"#;
        let tokens = tokenize(json).unwrap();
        let mut cursor = TokenCursor::new(&tokens, json);
        assert!(matches!(
            extract_material(&mut cursor, Target::DryRun),
            Err(GlbError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_image() {
        let json = br#"{"mimeType":"image/png","bufferView":3,"name":"albedo"}"#;
        let tokens = tokenize(json).unwrap();
        let mut cursor = TokenCursor::new(&tokens, json);
        let mut image = Image::default();
        extract_image(&mut cursor, Target::Record(&mut image)).unwrap();
        assert_eq!(image.buffer_view, Some(3));
        assert!(cursor.is_at_end());
    }
}
