use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the default config path: `<exe_dir>/config.json`
pub fn get_default_config_path() -> PathBuf {
    get_exe_dir().join("config.json")
}

/// Returns the bundled tessdata directory: `<exe_dir>/tessdata/`
pub fn get_tessdata_dir() -> PathBuf {
    get_exe_dir().join("tessdata")
}

/// Resolves a resource path from the config.
///
/// Absolute paths and paths that exist relative to the working directory
/// are used as given; otherwise the path is taken relative to the executable.
pub fn resolve_resource(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    get_exe_dir().join(path)
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_resource() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("icon.png");
        assert_eq!(resolve_resource(&absolute), absolute);

        let relative = Path::new("resources/template/does_not_exist.png");
        assert_eq!(resolve_resource(relative), get_exe_dir().join(relative));
    }
}
