use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct PortablePathManager;

impl PortablePathManager {
    /// Directory holding the executable, falling back to the working directory.
    pub fn root_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Model cache directory (./data/models).
    pub fn models_dir() -> PathBuf {
        Self::data_dir().join("models")
    }

    /// Create `dir` if it does not exist yet.
    #[cfg_attr(not(feature = "classifier"), allow(dead_code))]
    pub fn ensure_dir(dir: &Path) -> Result<(), std::io::Error> {
        if !dir.exists() {
            info!("Creating directory: {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
