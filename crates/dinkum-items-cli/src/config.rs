//! Extraction profile loading

use anyhow::{Context, Result};
use dinkum_items::ExtractionProfile;
use std::fs;
use std::path::Path;
use tracing::info;

/// Load a TOML profile, or the built-in one when no path is given.
///
/// Keys missing from the file keep their built-in values.
pub fn load_profile(path: Option<&Path>) -> Result<ExtractionProfile> {
    let Some(path) = path else {
        return Ok(ExtractionProfile::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile from {}", path.display()))?;
    let profile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse profile {}", path.display()))?;
    info!("Loaded profile from {}", path.display());
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinkum_items::FieldReader;
    use tempfile::TempDir;

    #[test]
    fn test_no_path_uses_builtin_profile() {
        assert_eq!(load_profile(None).unwrap(), ExtractionProfile::default());
    }

    #[test]
    fn test_partial_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.toml");
        fs::write(
            &path,
            r#"
data_dir = "Dinkum_Data"

durability_overrides = [
    { index = 10, durability = 25 },
]

[tool]
field = "isATool"
anchors = [
    { index = 0, expected = 1 },
    { index = 1, expected = 0 },
]
search = { start = 96, end = 320, step = 1 }
reader = "byte"

[limits]
min_items = 1500
"#,
        )
        .unwrap();

        let profile = load_profile(Some(&path)).unwrap();
        assert_eq!(profile.durability_overrides.get(10), Some(25));
        assert_eq!(profile.durability_overrides.get(699), None);
        assert_eq!(profile.tool.anchors.len(), 2);
        assert_eq!(profile.tool.search.start, 96);
        assert_eq!(profile.tool.reader, FieldReader::Byte);
        assert_eq!(profile.limits.min_items, 1500);
        assert_eq!(profile.limits.max_durability, 100_000);
        // Untouched sections keep the built-in values
        assert_eq!(profile.max_stack, ExtractionProfile::default().max_stack);
    }

    #[test]
    fn test_missing_profile_file() {
        let dir = TempDir::new().unwrap();
        let err = load_profile(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile"));
    }

    #[test]
    fn test_invalid_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[max_stack]\nfield = 3\n").unwrap();
        assert!(load_profile(Some(&path)).is_err());
    }
}
