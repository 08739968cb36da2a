/// Numeric type of one accessor component (`componentType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    /// Code outside 5120-5126, or the field was absent.
    #[default]
    Undefined,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Uint32,
    Float32,
}

impl ComponentType {
    pub fn from_code(code: u32) -> Self {
        match code {
            5120 => ComponentType::Int8,
            5121 => ComponentType::Uint8,
            5122 => ComponentType::Int16,
            5123 => ComponentType::Uint16,
            5125 => ComponentType::Uint32,
            5126 => ComponentType::Float32,
            _ => ComponentType::Undefined,
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            ComponentType::Undefined => None,
            ComponentType::Int8 => Some(5120),
            ComponentType::Uint8 => Some(5121),
            ComponentType::Int16 => Some(5122),
            ComponentType::Uint16 => Some(5123),
            ComponentType::Uint32 => Some(5125),
            ComponentType::Float32 => Some(5126),
        }
    }

    pub fn byte_length(&self) -> usize {
        match self {
            ComponentType::Undefined => 0,
            ComponentType::Int8 | ComponentType::Uint8 => 1,
            ComponentType::Int16 | ComponentType::Uint16 => 2,
            ComponentType::Uint32 | ComponentType::Float32 => 4,
        }
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ComponentType::Uint8 | ComponentType::Uint16 | ComponentType::Uint32
        )
    }
}

/// Shape of one accessor element (`type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    #[default]
    Undefined,
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    /// Exact, case-sensitive match against the glTF names.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"SCALAR" => ElementType::Scalar,
            b"VEC2" => ElementType::Vec2,
            b"VEC3" => ElementType::Vec3,
            b"VEC4" => ElementType::Vec4,
            b"MAT2" => ElementType::Mat2,
            b"MAT3" => ElementType::Mat3,
            b"MAT4" => ElementType::Mat4,
            _ => ElementType::Undefined,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Undefined => "UNDEFINED",
            ElementType::Scalar => "SCALAR",
            ElementType::Vec2 => "VEC2",
            ElementType::Vec3 => "VEC3",
            ElementType::Vec4 => "VEC4",
            ElementType::Mat2 => "MAT2",
            ElementType::Mat3 => "MAT3",
            ElementType::Mat4 => "MAT4",
        }
    }

    pub fn num_components(&self) -> usize {
        match self {
            ElementType::Undefined => 0,
            ElementType::Scalar => 1,
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 | ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
        }
    }
}

/// Primitive topology (`mode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    /// A code above 6; kept so the primitive is still reported.
    Unknown(u32),
}

impl PrimitiveMode {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => PrimitiveMode::Points,
            1 => PrimitiveMode::Lines,
            2 => PrimitiveMode::LineLoop,
            3 => PrimitiveMode::LineStrip,
            4 => PrimitiveMode::Triangles,
            5 => PrimitiveMode::TriangleStrip,
            6 => PrimitiveMode::TriangleFan,
            other => PrimitiveMode::Unknown(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            PrimitiveMode::Points => 0,
            PrimitiveMode::Lines => 1,
            PrimitiveMode::LineLoop => 2,
            PrimitiveMode::LineStrip => 3,
            PrimitiveMode::Triangles => 4,
            PrimitiveMode::TriangleStrip => 5,
            PrimitiveMode::TriangleFan => 6,
            PrimitiveMode::Unknown(code) => *code,
        }
    }
}

/// Intended GPU binding of a buffer view (`target`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferViewTarget {
    ArrayBuffer,
    ElementArrayBuffer,
    Other(u32),
}

impl BufferViewTarget {
    pub fn from_code(code: u32) -> Self {
        match code {
            34962 => BufferViewTarget::ArrayBuffer,
            34963 => BufferViewTarget::ElementArrayBuffer,
            other => BufferViewTarget::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_codes() {
        for code in [5120, 5121, 5122, 5123, 5125, 5126] {
            assert_eq!(ComponentType::from_code(code).code(), Some(code));
        }
        assert_eq!(ComponentType::from_code(5124), ComponentType::Undefined);
        assert_eq!(ComponentType::Uint16.byte_length(), 2);
        assert!(ComponentType::Uint8.is_unsigned_integer());
        assert!(!ComponentType::Float32.is_unsigned_integer());
    }

    #[test]
    fn test_element_names() {
        assert_eq!(ElementType::from_name(b"VEC3"), ElementType::Vec3);
        assert_eq!(ElementType::from_name(b"vec3"), ElementType::Undefined);
        assert_eq!(ElementType::from_name(b"VEC"), ElementType::Undefined);
        assert_eq!(ElementType::Mat4.num_components(), 16);
        assert_eq!(ElementType::Scalar.name(), "SCALAR");
    }

    #[test]
    fn test_mode_default() {
        assert_eq!(PrimitiveMode::default().code(), 4);
        assert_eq!(PrimitiveMode::from_code(9), PrimitiveMode::Unknown(9));
        assert_eq!(
            BufferViewTarget::from_code(34963),
            BufferViewTarget::ElementArrayBuffer
        );
    }
}
