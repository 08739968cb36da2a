//! End-to-end parsing of in-memory GLB containers.

use glbread_core::{
    ComponentType, ContainerError, ElementType, GlbError, PrimitiveMode, SchemaError, Stage,
};
use glbread_io::container::{GLB_CHUNK_BIN, GLB_CHUNK_JSON};
use glbread_io::{
    accessor_bytes, parse_glb, write_container, ParseOptions, SceneParser, StagingLayout,
};

const MINIMAL: &str = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 48}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 6}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "type": "VEC3", "count": 3},
    {"bufferView": 1, "componentType": 5123, "type": "SCALAR", "count": 3}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}]
}"#;

fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::with_capacity(48);
    for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        bin.extend_from_slice(&value.to_le_bytes());
    }
    for index in [0u16, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin.resize(48, 0);
    bin
}

fn minimal_glb() -> Vec<u8> {
    write_container(MINIMAL.as_bytes(), &triangle_bin())
}

#[test]
fn test_minimal_document() {
    let glb = minimal_glb();
    let parsed = parse_glb(&glb).unwrap();
    let document = &parsed.document;

    assert_eq!(document.accessor_count(), 2);
    assert_eq!(document.buffer_view_count(), 2);
    assert_eq!(document.buffer.byte_length, 48);

    let mesh = document.mesh().unwrap();
    assert_eq!(mesh.primitive_count(), 1);
    let primitive = mesh.primitives[0];
    assert_eq!(primitive.pos_accessor, 0);
    assert_eq!(primitive.idx_accessor, Some(1));
    assert_eq!(primitive.nrm_accessor, None);
    assert_eq!(primitive.mode, PrimitiveMode::Triangles);

    assert_eq!(document.accessors[0].count, 3);
    assert_eq!(document.accessors[0].element_type, ElementType::Vec3);
    assert_eq!(document.accessors[0].component_type, ComponentType::Float32);
    assert_eq!(document.accessors[1].component_type, ComponentType::Uint16);
    assert_eq!(document.buffer_views[1].byte_offset, 36);
}

#[test]
fn test_parse_is_idempotent() {
    let glb = minimal_glb();
    let first = parse_glb(&glb).unwrap();
    let second = parse_glb(&glb).unwrap();
    assert_eq!(first.document, second.document);

    let mut parser = SceneParser::new();
    let third = parser.parse(&glb).unwrap();
    let fourth = parser.parse(&glb).unwrap();
    assert_eq!(first.document, third.document);
    assert_eq!(third, fourth);
}

#[test]
fn test_document_outlives_parser() {
    let json = MINIMAL.as_bytes().to_vec();
    let document = {
        let mut parser = SceneParser::new();
        parser.parse_json(&json).unwrap()
    };
    drop(json);
    assert_eq!(document.accessor_count(), 2);
    assert_eq!(document.accessors[1].element_type, ElementType::Scalar);
}

#[test]
fn test_container_errors() {
    let glb = minimal_glb();

    let mut bad_magic = glb.clone();
    bad_magic[..4].copy_from_slice(b"gltf");
    let err = parse_glb(&bad_magic).unwrap_err();
    assert!(matches!(err, GlbError::Container(ContainerError::InvalidMagic { .. })));
    assert_eq!(err.stage(), Stage::Demux);

    let mut bad_json_tag = glb.clone();
    bad_json_tag[16..20].copy_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
    assert!(matches!(
        parse_glb(&bad_json_tag),
        Err(GlbError::Container(ContainerError::UnexpectedChunkType { offset: 12, .. }))
    ));

    let json_len = u32::from_le_bytes([glb[12], glb[13], glb[14], glb[15]]) as usize;
    let bin_header = 12 + 8 + json_len;
    let mut bad_bin_tag = glb.clone();
    bad_bin_tag[bin_header + 4..bin_header + 8].copy_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    assert_eq!(
        parse_glb(&bad_bin_tag).unwrap_err(),
        GlbError::Container(ContainerError::UnexpectedChunkType {
            offset: bin_header,
            expected: GLB_CHUNK_BIN,
            found: GLB_CHUNK_JSON,
        })
    );

    assert!(matches!(
        parse_glb(&glb[..glb.len() - 4]),
        Err(GlbError::Container(ContainerError::Truncated { .. }))
    ));
}

#[test]
fn test_nested_material_skip_lands_on_next_key() {
    let json = r#"{
      "materials": [
        {
          "pbrMetallicRoughness": {
            "baseColorTexture": {"index": 0, "texCoord": 1},
            "metallicFactor": 0,
            "roughnessFactor": 0.5
          },
          "name": "first"
        },
        {
          "name": "second",
          "pbrMetallicRoughness": {"baseColorFactor": [1, 1, 1, 1]},
          "extensions": {"KHR_materials_clearcoat": {"clearcoatTexture": {"index": 2, "extensions": {"KHR_texture_transform": {"offset": [0, 1]}}}}}
        }
      ],
      "buffers": [{"byteLength": 0}],
      "accessors": [{"bufferView": 0, "count": 7, "type": "SCALAR", "componentType": 5125}],
      "bufferViews": [{"buffer": 0, "byteLength": 0}]
    }"#;
    let glb = write_container(json.as_bytes(), &[]);
    let parsed = parse_glb(&glb).unwrap();
    assert_eq!(parsed.document.material_count, 2);
    assert_eq!(parsed.document.accessors[0].count, 7);
    assert_eq!(parsed.document.accessors[0].component_type, ComponentType::Uint32);
}

#[test]
fn test_json_errors_carry_offsets() {
    let glb = write_container(br#"{"buffers":[{"byteLength":4}],"asset":{"version" "2.0"}}"#, &[0; 4]);
    let err = parse_glb(&glb).unwrap_err();
    assert_eq!(err.stage(), Stage::Tokenize);
    assert_eq!(err.offset(), Some(49));

    let glb = write_container(br#"{"buffers":[{"byteLength":0x10}]}"#, &[0; 16]);
    let err = parse_glb(&glb).unwrap_err();
    assert_eq!(err.stage(), Stage::Tokenize);

    let glb = write_container(br#"{"buffers":[{"byteLength":1e2}]}"#, &[0; 100]);
    let err = parse_glb(&glb).unwrap_err();
    assert_eq!(
        err,
        GlbError::UnsupportedValue {
            offset: 27,
            reason: "expected a non-negative decimal integer"
        }
    );
    assert_eq!(err.stage(), Stage::Extract);
}

#[test]
fn test_missing_position_is_schema_error() {
    let json = br#"{"buffers":[{"byteLength":0}],"meshes":[{"primitives":[{"attributes":{"NORMAL":0}}]}]}"#;
    let glb = write_container(json, &[]);
    assert!(matches!(
        parse_glb(&glb),
        Err(GlbError::Schema(SchemaError::MissingPosition { .. }))
    ));
}

#[test]
fn test_all_meshes_kept_in_order() {
    let json = br#"{"buffers":[{"byteLength":0}],"accessors":[{},{},{}],"meshes":[{"primitives":[{"attributes":{"POSITION":0}}]},{"primitives":[{"attributes":{"POSITION":1}},{"attributes":{"POSITION":2},"mode":6}]}],"bufferViews":[{"buffer":0,"byteLength":0}]}"#;
    let glb = write_container(json, &[]);
    let parsed = parse_glb(&glb).unwrap();
    let document = parsed.document;
    assert_eq!(document.meshes.len(), 2);
    assert_eq!(document.primitive_count(), 3);
    assert_eq!(document.meshes[1].primitives[1].mode, PrimitiveMode::TriangleFan);
    assert_eq!(document.mesh().unwrap().primitives[0].pos_accessor, 0);
}

#[test]
fn test_out_of_range_references() {
    let json = br#"{"buffers":[{"byteLength":0}],"meshes":[{"primitives":[{"attributes":{"POSITION":4}}]}]}"#;
    let glb = write_container(json, &[]);
    assert_eq!(
        parse_glb(&glb).unwrap_err(),
        GlbError::Schema(SchemaError::IndexOutOfRange {
            what: "accessor",
            index: 4,
            len: 0
        })
    );

    let mut parser = SceneParser::with_options(ParseOptions::new().with_validate_references(false));
    assert!(parser.parse(&glb).is_ok());
}

#[test]
fn test_staging_from_container() {
    let glb = minimal_glb();
    let parsed = parse_glb(&glb).unwrap();
    let document = &parsed.document;

    assert_eq!(accessor_bytes(document, parsed.bin(), 1).unwrap(), &[0, 0, 1, 0, 2, 0]);

    let layout = StagingLayout::plan(document, document.mesh().unwrap()).unwrap();
    assert_eq!(layout.vertex_buffer_size(), 3 * 32);
    assert_eq!(layout.index_buffer_size(), 3 * 4);

    let buffers = layout.fill(document, parsed.bin()).unwrap();
    assert_eq!(buffers.indices, vec![0, 1, 2]);
    assert_eq!(buffers.vertices[2].position, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_oversized_count_is_range_error() {
    let json = br#"{"buffers":[{"byteLength":36}],"bufferViews":[{"buffer":0,"byteLength":36}],"accessors":[{"bufferView":0,"componentType":5126,"type":"VEC3","count":4000000000}],"meshes":[{"primitives":[{"attributes":{"POSITION":0}}]}]}"#;
    let glb = write_container(json, &triangle_bin()[..36]);
    let parsed = parse_glb(&glb).unwrap();
    let document = &parsed.document;

    let layout = StagingLayout::plan(document, document.mesh().unwrap()).unwrap();
    assert_eq!(layout.vertex_count(), 4_000_000_000);
    assert!(matches!(
        layout.fill(document, parsed.bin()),
        Err(SchemaError::RangeOutOfBounds { what: "accessor", len: 36, .. })
    ));
}

#[test]
fn test_deeply_nested_unknown_member_is_skipped() {
    const DEPTH: usize = 200_000;
    let mut json = Vec::with_capacity(DEPTH * 2 + 64);
    json.extend_from_slice(br#"{"extras":"#);
    json.resize(json.len() + DEPTH, b'[');
    json.resize(json.len() + DEPTH, b']');
    json.extend_from_slice(br#","buffers":[{"byteLength":0}]}"#);

    let glb = write_container(&json, &[]);
    let parsed = parse_glb(&glb).unwrap();
    assert_eq!(parsed.document.buffer.byte_length, 0);
    assert!(parsed.document.meshes.is_empty());
}
