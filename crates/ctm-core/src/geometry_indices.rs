//! Slot handles for UV and attribute maps.
//!
//! A handle is the zero-based position of a map in its mesh. The raw ABI
//! values (`0x0700 + i` for UV maps, `0x0800 + i` for attribute maps) are
//! available through `to_raw`/`from_raw`.

/// Raw handle value of the first UV map slot.
pub const UV_MAP_RAW_BASE: u32 = 0x0700;
/// Raw handle value of the first attribute map slot.
pub const ATTRIB_MAP_RAW_BASE: u32 = 0x0800;

const RAW_SLOT_SPAN: u32 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UvMapId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttribMapId(pub u32);

impl UvMapId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_raw(self) -> u32 {
        UV_MAP_RAW_BASE + self.0
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        raw.checked_sub(UV_MAP_RAW_BASE)
            .filter(|&i| i < RAW_SLOT_SPAN)
            .map(UvMapId)
    }
}

impl AttribMapId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_raw(self) -> u32 {
        ATTRIB_MAP_RAW_BASE + self.0
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        raw.checked_sub(ATTRIB_MAP_RAW_BASE)
            .filter(|&i| i < RAW_SLOT_SPAN)
            .map(AttribMapId)
    }
}

impl From<usize> for UvMapId {
    fn from(v: usize) -> Self {
        Self(v as u32)
    }
}

impl From<UvMapId> for usize {
    fn from(v: UvMapId) -> Self {
        v.0 as usize
    }
}

impl From<usize> for AttribMapId {
    fn from(v: usize) -> Self {
        Self(v as u32)
    }
}

impl From<AttribMapId> for usize {
    fn from(v: AttribMapId) -> Self {
        v.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_handles() {
        assert_eq!(UvMapId(0).to_raw(), 0x0700);
        assert_eq!(UvMapId(7).to_raw(), 0x0707);
        assert_eq!(AttribMapId(2).to_raw(), 0x0802);

        assert_eq!(UvMapId::from_raw(0x0703), Some(UvMapId(3)));
        assert_eq!(UvMapId::from_raw(0x0803), None);
        assert_eq!(UvMapId::from_raw(0x0000), None);
        assert_eq!(AttribMapId::from_raw(0x0800), Some(AttribMapId(0)));
        assert_eq!(AttribMapId::from_raw(0x0700), None);
    }

    #[test]
    fn test_usize_conversions() {
        let id: UvMapId = 4usize.into();
        assert_eq!(id.index(), 4);
        assert_eq!(usize::from(AttribMapId(6)), 6);
    }
}
