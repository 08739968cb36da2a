//! Example: parse a GLB file and print its geometry layout.
//!
//! Run with: cargo run --example inspect_glb -- path/to/model.glb
//!
//! Without a path, a one-triangle container is built in memory.

use glbread_io::{parse_glb, write_container, StagingLayout};

fn triangle() -> Vec<u8> {
    let positions: [f32; 9] = [
        0.0, 0.0, 0.0, // 0
        1.0, 0.0, 0.0, // 1
        0.0, 1.0, 0.0, // 2
    ];
    let mut bin: Vec<u8> = positions.iter().flat_map(|v| v.to_le_bytes()).collect();
    for index in [0u16, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }

    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 42}],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "type": "VEC3", "count": 3},
            {"bufferView": 1, "componentType": 5123, "type": "SCALAR", "count": 3}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}]
    }"#;
    write_container(json.as_bytes(), &bin)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bytes = match std::env::args().nth(1) {
        Some(path) => std::fs::read(path)?,
        None => triangle(),
    };

    let parsed = parse_glb(&bytes)?;
    let document = &parsed.document;
    println!(
        "JSON {:?}, BIN {:?}",
        parsed.container.json_range().range(),
        parsed.container.bin_range().range()
    );
    println!(
        "{} accessors, {} buffer views, {} meshes",
        document.accessor_count(),
        document.buffer_view_count(),
        document.meshes.len()
    );

    for (i, mesh) in document.meshes.iter().enumerate() {
        let layout = StagingLayout::plan(document, mesh)?;
        let buffers = layout.fill(document, parsed.bin())?;
        println!(
            "mesh {}: {} vertices ({} bytes), {} indices ({} bytes)",
            i,
            buffers.vertices.len(),
            layout.vertex_buffer_size(),
            buffers.indices.len(),
            layout.index_buffer_size()
        );
        for range in layout.ranges() {
            println!("  {:?}", range);
        }
    }
    Ok(())
}
