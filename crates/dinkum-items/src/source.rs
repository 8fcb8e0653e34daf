//! Asset container access.
//!
//! Parsing Unity serialized files is outside this crate. A container is any
//! source that can enumerate `(type name, path id, raw bytes)` triples; the
//! built-in [`DumpLoader`] reads the raw-object export layout
//! `<container>/<TypeName>/<path_id>.bin`.

use std::fs;
use std::path::{Path, PathBuf};

use strum::{Display, IntoStaticStr};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Unity object types the extractor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum ObjectType {
    MonoBehaviour,
    MonoScript,
}

/// One serialized object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetObject {
    pub type_name: String,
    pub path_id: i64,
    pub data: Vec<u8>,
}

impl AssetObject {
    pub fn new(type_name: impl Into<String>, path_id: i64, data: Vec<u8>) -> Self {
        Self {
            type_name: type_name.into(),
            path_id,
            data,
        }
    }

    pub fn is(&self, ty: ObjectType) -> bool {
        self.type_name == <&'static str>::from(ty)
    }
}

/// An opened asset container
pub trait AssetContainer {
    /// All objects in the container
    fn objects(&self) -> Result<Vec<AssetObject>>;
}

/// Opens containers by path
pub trait ContainerLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn AssetContainer>>;
}

/// In-memory container
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    objects: Vec<AssetObject>,
}

impl MemoryContainer {
    pub fn new(objects: Vec<AssetObject>) -> Self {
        Self { objects }
    }
}

impl AssetContainer for MemoryContainer {
    fn objects(&self) -> Result<Vec<AssetObject>> {
        Ok(self.objects.clone())
    }
}

/// Container backed by a directory of raw object dumps
#[derive(Debug, Clone)]
pub struct DumpContainer {
    root: PathBuf,
}

impl AssetContainer for DumpContainer {
    fn objects(&self) -> Result<Vec<AssetObject>> {
        let mut objects = Vec::new();
        for type_dir in sorted_entries(&self.root)? {
            if !type_dir.is_dir() {
                continue;
            }
            let Some(type_name) = type_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            for file in sorted_entries(&type_dir)? {
                let Some(path_id) = parse_dump_name(&file) else {
                    debug!("Ignoring {}", file.display());
                    continue;
                };
                objects.push(AssetObject::new(type_name, path_id, fs::read(&file)?));
            }
        }
        debug!("Loaded {} objects from {}", objects.len(), self.root.display());
        Ok(objects)
    }
}

/// Loader for [`DumpContainer`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpLoader;

impl ContainerLoader for DumpLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn AssetContainer>> {
        if !path.exists() {
            return Err(Error::SourceNotFound(path.display().to_string()));
        }
        if !path.is_dir() {
            return Err(Error::UnsupportedContainer(path.display().to_string()));
        }
        info!("Loading {}...", path.display());
        Ok(Box::new(DumpContainer {
            root: path.to_path_buf(),
        }))
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// `<path_id>.bin` -> path id
fn parse_dump_name(path: &Path) -> Option<i64> {
    if path.extension()? != "bin" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

/// Locate a game file under `<game_dir>/<data_dir>/`, falling back to the
/// first recursive match by file name
pub fn locate_game_file(game_dir: &Path, data_dir: &str, name: &str) -> Result<PathBuf> {
    let standard = game_dir.join(data_dir).join(name);
    if standard.exists() {
        return Ok(standard);
    }

    if game_dir.is_dir()
        && let Some(found) = find_recursive(game_dir, name)?
    {
        debug!("Found {} at non-standard location {}", name, found.display());
        return Ok(found);
    }

    Err(Error::SourceNotFound(format!(
        "could not find {}/{} in {}",
        data_dir,
        name,
        game_dir.display()
    )))
}

fn find_recursive(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let entries = sorted_entries(dir)?;
    if let Some(hit) = entries
        .iter()
        .find(|p| p.file_name().is_some_and(|n| n == name))
    {
        return Ok(Some(hit.clone()));
    }
    for sub in entries.iter().filter(|p| p.is_dir()) {
        if let Some(hit) = find_recursive(sub, name)? {
            return Ok(Some(hit));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_dump(root: &Path, type_name: &str, file: &str, data: &[u8]) {
        let dir = root.join(type_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), data).unwrap();
    }

    #[test]
    fn test_dump_loader_reads_objects() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("level0");
        write_dump(&root, "MonoBehaviour", "12.bin", &[1, 2, 3]);
        write_dump(&root, "MonoBehaviour", "-5.bin", &[4]);
        write_dump(&root, "MonoScript", "7.bin", &[9]);
        write_dump(&root, "MonoScript", "notes.txt", b"ignored");

        let container = DumpLoader.open(&root).unwrap();
        let objects = container.objects().unwrap();
        assert_eq!(objects.len(), 3);
        assert!(objects.contains(&AssetObject::new("MonoBehaviour", -5, vec![4])));
        assert!(objects.contains(&AssetObject::new("MonoBehaviour", 12, vec![1, 2, 3])));
        assert!(objects.iter().any(|o| o.is(ObjectType::MonoScript) && o.path_id == 7));
    }

    #[test]
    fn test_dump_loader_missing_path() {
        let tmp = TempDir::new().unwrap();
        let result = DumpLoader.open(&tmp.path().join("missing"));
        assert!(matches!(result, Err(Error::SourceNotFound(_))));
    }

    #[test]
    fn test_dump_loader_rejects_packed_container() {
        let tmp = TempDir::new().unwrap();
        let packed = tmp.path().join("resources.assets");
        fs::write(&packed, b"UnityFS").unwrap();

        let err = match DumpLoader.open(&packed) {
            Err(e) => e,
            Ok(_) => panic!("packed container should be rejected"),
        };
        assert!(matches!(err, Error::UnsupportedContainer(_)));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("not a raw object dump directory"));
    }

    #[test]
    fn test_locate_standard_path() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Dinkum_Data").join("level0");
        fs::create_dir_all(&target).unwrap();
        assert_eq!(
            locate_game_file(tmp.path(), "Dinkum_Data", "level0").unwrap(),
            target
        );
    }

    #[test]
    fn test_locate_recursive_fallback() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("Contents").join("Resources").join("Data");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("resources.assets"), b"").unwrap();
        assert_eq!(
            locate_game_file(tmp.path(), "Dinkum_Data", "resources.assets").unwrap(),
            nested.join("resources.assets")
        );
    }

    #[test]
    fn test_locate_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = locate_game_file(tmp.path(), "Dinkum_Data", "level0").unwrap_err();
        assert!(err.is_not_found());

        let err = locate_game_file(&tmp.path().join("nope"), "Dinkum_Data", "level0").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_object_type_names() {
        let obj = AssetObject::new("MonoBehaviour", 1, vec![]);
        assert!(obj.is(ObjectType::MonoBehaviour));
        assert!(!obj.is(ObjectType::MonoScript));
        assert_eq!(ObjectType::MonoScript.to_string(), "MonoScript");
    }
}
