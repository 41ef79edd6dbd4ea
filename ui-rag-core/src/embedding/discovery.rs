//! Model cache directory discovery
//!
//! Finds (and creates) the directory fastembed downloads models into.

use std::path::{Path, PathBuf};

use crate::config::ENV_MODELS_PATH;
use crate::error::{RagError, Result};

/// Resolve the model cache directory with priority:
/// 1. UI_RAG_MODELS_PATH environment variable
/// 2. Configured path
/// 3. User home directory (~/.ui-rag/models)
pub fn find_model_cache_dir(configured: Option<&Path>) -> Result<PathBuf> {
    let dir = if let Ok(models_path) = std::env::var(ENV_MODELS_PATH) {
        log::info!("Using {}: {}", ENV_MODELS_PATH, models_path);
        PathBuf::from(models_path)
    } else if let Some(path) = configured {
        path.to_path_buf()
    } else {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or_else(|| {
                RagError::config(format!(
                    "Cannot determine model cache directory. Set {} or embedding.backend.cache_dir",
                    ENV_MODELS_PATH
                ))
            })?;
        PathBuf::from(home).join(".ui-rag").join("models")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_created() {
        if std::env::var(ENV_MODELS_PATH).is_ok() {
            return;
        }
        let temp = tempfile::tempdir().unwrap();
        let wanted = temp.path().join("models");
        let dir = find_model_cache_dir(Some(&wanted)).unwrap();
        assert_eq!(dir, wanted);
        assert!(dir.is_dir());
    }
}
