//! Resolving accessors against the BIN chunk and laying out staging buffers.
//!
//! Nothing here touches a GPU. [`StagingLayout::plan`] computes where each
//! primitive lands in one combined vertex buffer and one combined index
//! buffer, and [`StagingLayout::fill`] produces their contents. Indices stay
//! local to their primitive: a draw supplies `vertex_offset` as its base
//! vertex.

use byteorder::{ByteOrder, LittleEndian};
use glbread_core::{ComponentType, ElementType, PrimitiveMode, SchemaError};
use log::debug;

use crate::document::{Accessor, Mesh, MeshPrimitive, SceneDocument};

/// Bytes per staged vertex: position and normal, each `[f32; 4]`.
pub const VERTEX_SIZE: usize = 32;
/// Bytes per staged index.
pub const INDEX_SIZE: usize = 4;

/// The bytes one accessor covers, with the layout needed to step through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorView<'b> {
    bytes: &'b [u8],
    stride: usize,
    element_size: usize,
    count: usize,
    component_type: ComponentType,
    element_type: ElementType,
}

impl<'b> AccessorView<'b> {
    /// From the first byte of the first element to the last byte of the
    /// last, including any interleaved bytes in between.
    pub fn bytes(&self) -> &'b [u8] {
        self.bytes
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Each element's bytes, in order.
    pub fn elements(&self) -> impl Iterator<Item = &'b [u8]> + 'b {
        let size = self.element_size;
        self.bytes
            .chunks(self.stride)
            .filter_map(move |chunk| chunk.get(..size))
    }
}

fn lookup(document: &SceneDocument, index: u32) -> Result<&Accessor, SchemaError> {
    document
        .accessor(index)
        .ok_or(SchemaError::IndexOutOfRange {
            what: "accessor",
            index,
            len: document.accessor_count(),
        })
}

/// Resolves accessor `index` to its bytes inside `bin`.
pub fn accessor_view<'b>(
    document: &SceneDocument,
    bin: &'b [u8],
    index: u32,
) -> Result<AccessorView<'b>, SchemaError> {
    let accessor = lookup(document, index)?;
    let view = document
        .buffer_view(accessor.buffer_view)
        .ok_or(SchemaError::IndexOutOfRange {
            what: "buffer view",
            index: accessor.buffer_view,
            len: document.buffer_view_count(),
        })?;

    let element_size = accessor.element_size();
    if element_size == 0 {
        return Err(SchemaError::UnsupportedLayout {
            index,
            reason: "undefined component or element type",
        });
    }
    let stride = match view.byte_stride {
        Some(stride) if (stride as usize) < element_size => {
            return Err(SchemaError::UnsupportedLayout {
                index,
                reason: "byte stride is smaller than one element",
            })
        }
        Some(stride) => stride as usize,
        None => element_size,
    };

    let length = match u64::from(accessor.count) {
        0 => 0,
        count => (count - 1) * stride as u64 + element_size as u64,
    };
    let end_in_view = u64::from(accessor.byte_offset) + length;
    if end_in_view > u64::from(view.byte_length) {
        return Err(SchemaError::RangeOutOfBounds {
            what: "accessor",
            start: u64::from(accessor.byte_offset),
            end: end_in_view,
            len: u64::from(view.byte_length),
        });
    }

    let start = u64::from(view.byte_offset) + u64::from(accessor.byte_offset);
    let end = start + length;
    let bytes = usize::try_from(start)
        .ok()
        .zip(usize::try_from(end).ok())
        .and_then(|(start, end)| bin.get(start..end))
        .ok_or(SchemaError::RangeOutOfBounds {
            what: "buffer view",
            start,
            end,
            len: bin.len() as u64,
        })?;

    Ok(AccessorView {
        bytes,
        stride,
        element_size,
        count: accessor.count as usize,
        component_type: accessor.component_type,
        element_type: accessor.element_type,
    })
}

/// The exact byte slice accessor `index` covers inside `bin`.
pub fn accessor_bytes<'b>(document: &SceneDocument, bin: &'b [u8], index: u32) -> Result<&'b [u8], SchemaError> {
    accessor_view(document, bin, index).map(|view| view.bytes())
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// `w` is 1.
    pub position: [f32; 4],
    /// `w` is 0; all zero when the primitive has no normals.
    pub normal: [f32; 4],
}

/// Where one primitive lives in the combined buffers, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub mode: PrimitiveMode,
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub index_offset: u32,
    pub index_count: u32,
}

impl DrawRange {
    pub fn vertex_byte_offset(&self) -> u64 {
        u64::from(self.vertex_offset) * VERTEX_SIZE as u64
    }

    pub fn index_byte_offset(&self) -> u64 {
        u64::from(self.index_offset) * INDEX_SIZE as u64
    }
}

/// Combined vertex and index buffer contents for one mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StagingBuffers {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl StagingBuffers {
    /// Vertices as little-endian bytes, ready for upload.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let floats: Vec<f32> = self
            .vertices
            .iter()
            .flat_map(|vertex| vertex.position.into_iter().chain(vertex.normal))
            .collect();
        let mut bytes = vec![0u8; floats.len() * 4];
        LittleEndian::write_f32_into(&floats, &mut bytes);
        bytes
    }

    /// Indices as little-endian bytes, ready for upload.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.indices.len() * INDEX_SIZE];
        LittleEndian::write_u32_into(&self.indices, &mut bytes);
        bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    primitives: Vec<MeshPrimitive>,
    ranges: Vec<DrawRange>,
    vertex_count: u32,
    index_count: u32,
}

fn too_large(index: u32) -> SchemaError {
    SchemaError::UnsupportedLayout {
        index,
        reason: "staging buffer exceeds u32 element range",
    }
}

fn read_vec3(element: &[u8]) -> [f32; 3] {
    let mut xyz = [0f32; 3];
    LittleEndian::read_f32_into(element, &mut xyz);
    xyz
}

fn require_vec3_float(view: &AccessorView<'_>, index: u32, reason: &'static str) -> Result<(), SchemaError> {
    if view.element_type() != ElementType::Vec3 || view.component_type() != ComponentType::Float32 {
        return Err(SchemaError::UnsupportedLayout { index, reason });
    }
    Ok(())
}

impl StagingLayout {
    /// Lays out every primitive of `mesh` back to back, in document order.
    pub fn plan(document: &SceneDocument, mesh: &Mesh) -> Result<Self, SchemaError> {
        let mut ranges = Vec::with_capacity(mesh.primitives.len());
        let mut vertex_offset = 0u32;
        let mut index_offset = 0u32;

        for primitive in &mesh.primitives {
            let vertex_count = lookup(document, primitive.pos_accessor)?.count;
            if let Some(normal) = primitive.nrm_accessor {
                if lookup(document, normal)?.count != vertex_count {
                    return Err(SchemaError::UnsupportedLayout {
                        index: normal,
                        reason: "normal count differs from position count",
                    });
                }
            }
            let index_count = match primitive.idx_accessor {
                Some(index) => lookup(document, index)?.count,
                None => vertex_count,
            };

            ranges.push(DrawRange {
                mode: primitive.mode,
                vertex_offset,
                vertex_count,
                index_offset,
                index_count,
            });
            vertex_offset = vertex_offset
                .checked_add(vertex_count)
                .ok_or_else(|| too_large(primitive.pos_accessor))?;
            index_offset = index_offset
                .checked_add(index_count)
                .ok_or_else(|| too_large(primitive.idx_accessor.unwrap_or(primitive.pos_accessor)))?;
        }

        debug!(
            "staging layout: {} draws, {} vertices, {} indices",
            ranges.len(),
            vertex_offset,
            index_offset
        );
        Ok(Self {
            primitives: mesh.primitives.clone(),
            ranges,
            vertex_count: vertex_offset,
            index_count: index_offset,
        })
    }

    pub fn ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_buffer_size(&self) -> u64 {
        u64::from(self.vertex_count) * VERTEX_SIZE as u64
    }

    pub fn index_buffer_size(&self) -> u64 {
        u64::from(self.index_count) * INDEX_SIZE as u64
    }

    /// Builds the interleaved vertices and widened indices.
    ///
    /// Positions and normals must be `VEC3` floats and indices unsigned
    /// scalars. A primitive without indices gets `0..vertex_count`, one
    /// without normals gets zero normals. Every index must address a vertex
    /// of its own primitive.
    ///
    /// Every accessor is resolved against `bin` before the staging buffers
    /// are allocated.
    pub fn fill(&self, document: &SceneDocument, bin: &[u8]) -> Result<StagingBuffers, SchemaError> {
        let sources = self
            .primitives
            .iter()
            .map(|primitive| PrimitiveSource::resolve(document, bin, primitive))
            .collect::<Result<Vec<_>, _>>()?;

        let mut vertices = Vec::with_capacity(self.vertex_count as usize);
        let mut indices = Vec::with_capacity(self.index_count as usize);

        for (source, range) in sources.iter().zip(&self.ranges) {
            let first = vertices.len();
            vertices.extend(source.positions.elements().map(|element| {
                let [x, y, z] = read_vec3(element);
                Vertex {
                    position: [x, y, z, 1.0],
                    normal: [0.0; 4],
                }
            }));

            if let Some(normals) = &source.normals {
                for (vertex, element) in vertices[first..].iter_mut().zip(normals.elements()) {
                    let [x, y, z] = read_vec3(element);
                    vertex.normal = [x, y, z, 0.0];
                }
            }

            match &source.indices {
                Some(view) => {
                    for element in view.elements() {
                        let value = match view.component_type() {
                            ComponentType::Uint8 => u32::from(element[0]),
                            ComponentType::Uint16 => u32::from(LittleEndian::read_u16(element)),
                            _ => LittleEndian::read_u32(element),
                        };
                        if value >= range.vertex_count {
                            return Err(SchemaError::IndexOutOfRange {
                                what: "vertex",
                                index: value,
                                len: range.vertex_count as usize,
                            });
                        }
                        indices.push(value);
                    }
                }
                None => indices.extend(0..range.vertex_count),
            }
        }

        Ok(StagingBuffers { vertices, indices })
    }
}

/// The resolved, type-checked accessors of one primitive.
struct PrimitiveSource<'b> {
    positions: AccessorView<'b>,
    normals: Option<AccessorView<'b>>,
    indices: Option<AccessorView<'b>>,
}

impl<'b> PrimitiveSource<'b> {
    fn resolve(
        document: &SceneDocument,
        bin: &'b [u8],
        primitive: &MeshPrimitive,
    ) -> Result<Self, SchemaError> {
        let positions = accessor_view(document, bin, primitive.pos_accessor)?;
        require_vec3_float(&positions, primitive.pos_accessor, "POSITION must be VEC3 FLOAT")?;

        let normals = match primitive.nrm_accessor {
            Some(index) => {
                let normals = accessor_view(document, bin, index)?;
                require_vec3_float(&normals, index, "NORMAL must be VEC3 FLOAT")?;
                Some(normals)
            }
            None => None,
        };

        let indices = match primitive.idx_accessor {
            Some(index) => {
                let view = accessor_view(document, bin, index)?;
                if view.element_type() != ElementType::Scalar
                    || !view.component_type().is_unsigned_integer()
                {
                    return Err(SchemaError::UnsupportedLayout {
                        index,
                        reason: "indices must be unsigned SCALAR",
                    });
                }
                Some(view)
            }
            None => None,
        };

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }
}
