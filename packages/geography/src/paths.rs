//! Data directory resolution for boundary layer files.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the default data directory.
pub const DATA_DIR_ENV: &str = "BIODIVERSITY_MAP_DATA_DIR";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// current directory if the manifest is not nested as expected.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Resolves the data directory holding boundary files.
///
/// Precedence: `explicit` (the `--data-dir` flag), then
/// [`DATA_DIR_ENV`], then `data/` under the workspace root.
#[must_use]
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| project_root().join("data"), PathBuf::from)
}

/// Resolves a layer file path against the data directory. Absolute paths
/// are returned unchanged.
#[must_use]
pub fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = data_dir(Some(Path::new("/srv/boundaries")));
        assert_eq!(dir, PathBuf::from("/srv/boundaries"));
    }

    #[test]
    fn resolves_relative_paths_against_data_dir() {
        let resolved = resolve(Path::new("/srv/boundaries"), Path::new("asp.geojson"));
        assert_eq!(resolved, PathBuf::from("/srv/boundaries/asp.geojson"));
    }

    #[test]
    fn keeps_absolute_paths() {
        let resolved = resolve(Path::new("/srv/boundaries"), Path::new("/tmp/asp.geojson"));
        assert_eq!(resolved, PathBuf::from("/tmp/asp.geojson"));
    }

    #[test]
    fn project_root_contains_packages() {
        assert!(project_root().join("packages").is_dir());
    }
}
