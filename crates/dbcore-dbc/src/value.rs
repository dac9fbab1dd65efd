//! Typed column values.

/// One decoded column value.
///
/// String-offset columns decode as [`FieldValue::UInt32`]; resolving them
/// against the string pool is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Unsigned 8-bit integer.
    UInt8(u8),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
}

impl FieldValue {
    /// Try to get this value as a u32. Accepts any unsigned integer.
    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::UInt32(v) => Some(*v),
            FieldValue::UInt8(v) => Some(*v as u32),
            _ => None,
        }
    }

    /// Try to get this value as an i32.
    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FieldValue::Int32(v) => Some(*v),
            FieldValue::UInt8(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Try to get this value as a u8.
    #[inline]
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            FieldValue::UInt8(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as an f32.
    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldValue::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float32(v) => Some(*v as f64),
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int32(_) => "int32",
            FieldValue::UInt32(_) => "uint32",
            FieldValue::UInt8(_) => "uint8",
            FieldValue::Float32(_) => "float32",
            FieldValue::Float64(_) => "float64",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::UInt32(v) => write!(f, "{}", v),
            FieldValue::UInt8(v) => write!(f, "{}", v),
            FieldValue::Float32(v) => write!(f, "{}", v),
            FieldValue::Float64(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Int32(v) => serializer.serialize_i32(*v),
            FieldValue::UInt32(v) => serializer.serialize_u32(*v),
            FieldValue::UInt8(v) => serializer.serialize_u8(*v),
            FieldValue::Float32(v) => serializer.serialize_f32(*v),
            FieldValue::Float64(v) => serializer.serialize_f64(*v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::UInt32(7).as_u32(), Some(7));
        assert_eq!(FieldValue::UInt8(7).as_u32(), Some(7));
        assert_eq!(FieldValue::Int32(7).as_u32(), None);
        assert_eq!(FieldValue::Int32(-3).as_i32(), Some(-3));
        assert_eq!(FieldValue::Float32(0.5).as_f64(), Some(0.5));
        assert_eq!(FieldValue::Float64(0.5).as_f32(), None);
        assert_eq!(FieldValue::UInt8(9).as_u8(), Some(9));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Int32(-42).to_string(), "-42");
        assert_eq!(FieldValue::UInt32(42).to_string(), "42");
        assert_eq!(FieldValue::Float32(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::UInt8(255).type_name(), "uint8");
    }
}
