//! glbread I/O library: GLB containers in, renderer-ready scene records out.
//!
//! Loading runs in three stages, each reporting failures through
//! [`GlbError`](glbread_core::GlbError):
//!
//! | Stage    | Module                   | Produces                         |
//! |----------|--------------------------|----------------------------------|
//! | demux    | [`container`]            | JSON and BIN chunk ranges        |
//! | tokenize | `glbread_core::tokenizer`| flat pre-order token array       |
//! | extract  | [`schema`], [`extract`]  | [`SceneDocument`]                |
//!
//! [`geometry`] then resolves the document against the BIN chunk.
//!
//! ```ignore
//! use glbread_io::{parse_glb, StagingLayout};
//!
//! let bytes = std::fs::read("model.glb")?;
//! let parsed = parse_glb(&bytes)?;
//! if let Some(mesh) = parsed.document.mesh() {
//!     let layout = StagingLayout::plan(&parsed.document, mesh)?;
//!     let buffers = layout.fill(&parsed.document, parsed.bin())?;
//!     upload(buffers.vertex_bytes(), buffers.index_bytes(), layout.ranges());
//! }
//! ```

pub mod container;
pub mod document;
pub mod extract;
pub mod geometry;
pub mod options;
pub mod parser;
pub mod schema;
pub mod validate;

pub use container::{demux, demux_with, write_container, ChunkRange, Container};
pub use document::{Accessor, Buffer, BufferView, Mesh, MeshPrimitive, SceneDocument};
pub use extract::Target;
pub use geometry::{accessor_bytes, accessor_view, AccessorView, DrawRange, StagingBuffers, StagingLayout, Vertex};
pub use options::ParseOptions;
pub use parser::{parse_glb, ParsedGlb, SceneParser};
pub use schema::parse_document;
