//! Serialized layout constants for Unity MonoBehaviour objects
//!
//! Only the parts of the layout that are stable across game updates live
//! here. Field positions inside the fixed-size tail are discovered at runtime
//! by calibration.

/// Header shared by every MonoBehaviour
pub mod behaviour {
    /// GameObject PPtr (12) + Enabled (4, aligned) + Script PPtr (12)
    pub const HEADER_SIZE: usize = 28;

    /// Byte range of the script PPtr's path id
    pub const SCRIPT_PATH_ID: std::ops::Range<usize> = 20..28;

    /// Strings preceding the fixed-size tail of an InventoryItem:
    /// m_Name, internal category, display name, description
    pub const HEADER_STRING_FIELDS: usize = 4;
}

/// PPtr (object reference) encoding
pub mod pptr {
    /// i32 file id + i64 path id
    pub const STRIDE: usize = 12;

    /// Offset of the path id inside one PPtr
    pub const PATH_ID: usize = 4;
}

/// Localization term table
pub mod names {
    /// Bytes searched after a term key for its translated value
    pub const VALUE_WINDOW: usize = 200;

    /// Exclusive bounds on a plausible display-name length
    pub const MIN_LEN_EXCLUSIVE: u32 = 1;
    pub const MAX_LEN_EXCLUSIVE: u32 = 100;
}

/// Width in bytes of the length prefix on every serialized string
pub const STRING_PREFIX: usize = 4;
