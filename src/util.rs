use anyhow::{anyhow, Result};
use std::fs::File;
use std::path::{Component, Path, PathBuf};

pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Lexically resolves `.` and `..` components. Doesn't touch the file system,
/// so it works for paths that don't exist yet (e.g., the output directory
/// before the first build).
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            _ => normalized.push(component),
        }
    }
    normalized
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(PathBuf::from("/site/docs"), normalize(Path::new("/site/./docs")));
        assert_eq!(PathBuf::from("/"), normalize(Path::new("/site/docs/../..")));
        assert_eq!(PathBuf::from("../docs"), normalize(Path::new("../docs")));
        assert_eq!(PathBuf::from("../.."), normalize(Path::new("../..")));
    }

    #[test]
    fn test_open_names_kind_and_path() {
        let err = open(Path::new("./testdata/nope.yaml"), "project").unwrap_err();
        assert!(err.to_string().contains("Opening project file `./testdata/nope.yaml`"));
    }
}
