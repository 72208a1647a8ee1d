use crate::models::{RegionMap, SourceFile};
use super::FormatError;

/// Convert RegionMap to pretty-printed JSON
pub fn to_json(region_map: &RegionMap) -> Result<String, FormatError> {
    serde_json::to_string_pretty(region_map).map_err(FormatError::from)
}

/// Convert a single file's snapshot to pretty-printed JSON
pub fn file_to_json(file: &SourceFile) -> Result<String, FormatError> {
    serde_json::to_string_pretty(file).map_err(FormatError::from)
}
