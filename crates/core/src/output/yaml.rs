use crate::models::{RegionMap, SourceFile};
use super::FormatError;

/// Convert RegionMap to YAML
pub fn to_yaml(region_map: &RegionMap) -> Result<String, FormatError> {
    serde_yaml::to_string(region_map).map_err(FormatError::from)
}

/// Convert a single file's snapshot to YAML
pub fn file_to_yaml(file: &SourceFile) -> Result<String, FormatError> {
    serde_yaml::to_string(file).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegionStats, ScanMetadata};
    use std::path::PathBuf;

    #[test]
    fn test_to_yaml() {
        let region_map = RegionMap {
            root: PathBuf::from("/test"),
            files: vec![],
            stats: RegionStats::default(),
            metadata: ScanMetadata::default(),
        };

        let yaml = to_yaml(&region_map).unwrap();
        assert!(yaml.contains("root:"));
        assert!(yaml.contains("files:"));
    }
}
