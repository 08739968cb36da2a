//! Fixed-layout records extracted from the JSON document.
//!
//! Every record copies numeric values out of the token stream, so a
//! [`SceneDocument`] does not borrow the JSON text or the token array.

use glbread_core::{BufferViewTarget, ComponentType, ElementType, PrimitiveMode};

/// Typed view over a byte range of the binary blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accessor {
    pub buffer_view: u32,
    pub byte_offset: u32,
    pub component_type: ComponentType,
    pub element_type: ElementType,
    pub count: u32,
}

impl Accessor {
    /// Size in bytes of one element, or 0 when either type is undefined.
    pub fn element_size(&self) -> usize {
        self.component_type.byte_length() * self.element_type.num_components()
    }
}

/// Byte sub-range of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferView {
    pub buffer: u32,
    pub byte_length: u32,
    pub byte_offset: u32,
    pub byte_stride: Option<u32>,
    pub target: Option<BufferViewTarget>,
}

impl BufferView {
    pub fn end(&self) -> u64 {
        u64::from(self.byte_offset) + u64::from(self.byte_length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buffer {
    pub byte_length: u32,
}

/// One drawable piece of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshPrimitive {
    pub pos_accessor: u32,
    pub nrm_accessor: Option<u32>,
    pub idx_accessor: Option<u32>,
    pub material: Option<u32>,
    pub mode: PrimitiveMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    /// Primitives in document order.
    pub primitives: Vec<MeshPrimitive>,
}

impl Mesh {
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}

/// The renderer-ready subset of a glTF document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneDocument {
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffer: Buffer,
    pub meshes: Vec<Mesh>,
    /// Number of entries in `materials`, for validating primitive materials.
    pub material_count: usize,
}

impl SceneDocument {
    pub fn accessor_count(&self) -> usize {
        self.accessors.len()
    }

    pub fn buffer_view_count(&self) -> usize {
        self.buffer_views.len()
    }

    /// The primary mesh, i.e. the first one in document order.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.meshes.first()
    }

    /// Total primitive count across all meshes.
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(Mesh::primitive_count).sum()
    }

    pub fn accessor(&self, index: u32) -> Option<&Accessor> {
        self.accessors.get(index as usize)
    }

    pub fn buffer_view(&self, index: u32) -> Option<&BufferView> {
        self.buffer_views.get(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_size() {
        let accessor = Accessor {
            component_type: ComponentType::Float32,
            element_type: ElementType::Vec3,
            ..Default::default()
        };
        assert_eq!(accessor.element_size(), 12);
        assert_eq!(Accessor::default().element_size(), 0);
    }

    #[test]
    fn test_document_counts() {
        let document = SceneDocument {
            meshes: vec![
                Mesh {
                    primitives: vec![MeshPrimitive::default(); 2],
                },
                Mesh {
                    primitives: vec![MeshPrimitive::default()],
                },
            ],
            ..Default::default()
        };
        assert_eq!(document.primitive_count(), 3);
        assert_eq!(document.mesh().map(Mesh::primitive_count), Some(2));
        assert!(document.accessor(0).is_none());
    }

    #[test]
    fn test_plain_data() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SceneDocument>();
    }
}
