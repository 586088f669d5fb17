//! Query keys for [`Context::query`](crate::context::Context::query).

use std::fmt;

use crate::geometry_indices::{AttribMapId, UvMapId};
use crate::status::{invalid_argument, CtmError};

/// Per-map query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapProperty {
    Name,
    /// UV maps only.
    FileName,
    Precision,
    /// Attribute maps only.
    Components,
}

impl MapProperty {
    pub const fn to_raw(self) -> u32 {
        match self {
            MapProperty::Name => 0x0501,
            MapProperty::FileName => 0x0502,
            MapProperty::Precision => 0x0503,
            MapProperty::Components => 0x0504,
        }
    }
}

impl TryFrom<u32> for MapProperty {
    type Error = CtmError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0x0501 => Ok(MapProperty::Name),
            0x0502 => Ok(MapProperty::FileName),
            0x0503 => Ok(MapProperty::Precision),
            0x0504 => Ok(MapProperty::Components),
            _ => Err(invalid_argument(format!("unknown map property {:#06x}", raw))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    VertexCount,
    TriangleCount,
    HasNormals,
    UvMapCount,
    AttribMapCount,
    VertexPrecision,
    NormalPrecision,
    CompressionMethod,
    CompressionLevel,
    FileComment,
    UvMap(UvMapId, MapProperty),
    AttribMap(AttribMapId, MapProperty),
}

impl Property {
    /// Value type every successful query for this key returns.
    pub fn kind(self) -> PropertyKind {
        match self {
            Property::VertexCount
            | Property::TriangleCount
            | Property::HasNormals
            | Property::UvMapCount
            | Property::AttribMapCount
            | Property::CompressionMethod
            | Property::CompressionLevel => PropertyKind::Integer,
            Property::VertexPrecision | Property::NormalPrecision => PropertyKind::Float,
            Property::FileComment => PropertyKind::Text,
            Property::UvMap(_, p) | Property::AttribMap(_, p) => match p {
                MapProperty::Name | MapProperty::FileName => PropertyKind::Text,
                MapProperty::Precision => PropertyKind::Float,
                MapProperty::Components => PropertyKind::Integer,
            },
        }
    }

    /// Key value for the global properties; map properties have none.
    pub fn to_raw(self) -> Option<u32> {
        Some(match self {
            Property::VertexCount => 0x0301,
            Property::TriangleCount => 0x0302,
            Property::HasNormals => 0x0303,
            Property::UvMapCount => 0x0304,
            Property::AttribMapCount => 0x0305,
            Property::VertexPrecision => 0x0306,
            Property::NormalPrecision => 0x0307,
            Property::CompressionMethod => 0x0308,
            Property::FileComment => 0x0309,
            Property::CompressionLevel => 0x030A,
            Property::UvMap(..) | Property::AttribMap(..) => return None,
        })
    }

    /// Resolves a global key, or a map handle plus map key.
    pub fn from_raw(raw: u32, map_property: Option<u32>) -> Result<Self, CtmError> {
        if let Some(id) = UvMapId::from_raw(raw) {
            let p = map_property.ok_or_else(|| invalid_argument("map query without a map property"))?;
            return Ok(Property::UvMap(id, MapProperty::try_from(p)?));
        }
        if let Some(id) = AttribMapId::from_raw(raw) {
            let p = map_property.ok_or_else(|| invalid_argument("map query without a map property"))?;
            return Ok(Property::AttribMap(id, MapProperty::try_from(p)?));
        }
        Ok(match raw {
            0x0301 => Property::VertexCount,
            0x0302 => Property::TriangleCount,
            0x0303 => Property::HasNormals,
            0x0304 => Property::UvMapCount,
            0x0305 => Property::AttribMapCount,
            0x0306 => Property::VertexPrecision,
            0x0307 => Property::NormalPrecision,
            0x0308 => Property::CompressionMethod,
            0x0309 => Property::FileComment,
            0x030A => Property::CompressionLevel,
            _ => return Err(invalid_argument(format!("unknown property {:#06x}", raw))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Integer,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(u32),
    Float(f32),
    Text(Option<String>),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(Some(s)) => f.write_str(s),
            PropertyValue::Text(None) => f.write_str("(none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_keys_roundtrip() {
        let globals = [
            Property::VertexCount,
            Property::TriangleCount,
            Property::HasNormals,
            Property::UvMapCount,
            Property::AttribMapCount,
            Property::VertexPrecision,
            Property::NormalPrecision,
            Property::CompressionMethod,
            Property::CompressionLevel,
            Property::FileComment,
        ];
        for p in globals {
            let raw = p.to_raw().unwrap();
            assert_eq!(Property::from_raw(raw, None).unwrap(), p);
        }
        assert!(Property::from_raw(0x0399, None).is_err());
    }

    #[test]
    fn test_map_keys() {
        let p = Property::from_raw(0x0701, Some(0x0502)).unwrap();
        assert_eq!(p, Property::UvMap(UvMapId(1), MapProperty::FileName));
        assert_eq!(p.kind(), PropertyKind::Text);
        assert_eq!(p.to_raw(), None);
        let p = Property::from_raw(0x0800, Some(0x0503)).unwrap();
        assert_eq!(p, Property::AttribMap(AttribMapId(0), MapProperty::Precision));
        assert_eq!(p.kind(), PropertyKind::Float);
        assert!(Property::from_raw(0x0700, None).is_err());
        assert!(Property::from_raw(0x0700, Some(0x0599)).is_err());
    }
}
