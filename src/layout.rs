//! Operation-specific directory layout.
//!
//! Each batch operation works on one subdirectory relative to a root, which
//! defaults to the executable's own directory (falling back to the current
//! working directory). Directories are created on demand; a creation failure
//! aborts the operation with a reported error, no retry.

use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::TunedeckError;

/// The directory names for each operation, resolved against a root.
#[derive(Debug, Clone)]
pub struct Layout {
    /// The directory all operation subdirectories live under.
    pub root: PathBuf,
    /// Where remote fetches land.
    pub download_dir: String,
    /// Source directory for video-to-audio conversion.
    pub convert_input_dir: String,
    /// Destination directory for converted audio.
    pub convert_output_dir: String,
    /// Staging directory for tag stripping.
    pub strip_dir: String,
    /// Staging directory for renaming from tags.
    pub rename_dir: String,
}

impl Layout {
    /// Layout with the conventional directory names under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            download_dir: "YouTubeDownloads".to_string(),
            convert_input_dir: "VideosToConvert".to_string(),
            convert_output_dir: "ConvertedMP3s".to_string(),
            strip_dir: "Audio_For_Tag_Removal".to_string(),
            rename_dir: "Audio_For_Renaming".to_string(),
        }
    }

    /// Layout rooted at the running executable's directory.
    ///
    /// Falls back to the current working directory when the executable path
    /// cannot be determined.
    pub fn discover() -> Result<Self, TunedeckError> {
        let root = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };
        Ok(Self::new(root))
    }

    /// Download target directory.
    pub fn download_path(&self) -> PathBuf {
        self.root.join(&self.download_dir)
    }

    /// Conversion source directory.
    pub fn convert_input_path(&self) -> PathBuf {
        self.root.join(&self.convert_input_dir)
    }

    /// Conversion destination directory.
    pub fn convert_output_path(&self) -> PathBuf {
        self.root.join(&self.convert_output_dir)
    }

    /// Tag-stripping staging directory.
    pub fn strip_path(&self) -> PathBuf {
        self.root.join(&self.strip_dir)
    }

    /// Renaming staging directory.
    pub fn rename_path(&self) -> PathBuf {
        self.root.join(&self.rename_dir)
    }

    /// Create `path` (and parents) if absent.
    pub fn ensure(&self, path: &Path) -> Result<(), TunedeckError> {
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|source| TunedeckError::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Created directory {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_resolve_under_root() {
        let layout = Layout::new("/srv/deck");
        assert_eq!(layout.download_path(), Path::new("/srv/deck/YouTubeDownloads"));
        assert_eq!(layout.strip_path(), Path::new("/srv/deck/Audio_For_Tag_Removal"));
    }

    #[test]
    fn ensure_creates_missing_directories() {
        let root = tempdir().unwrap();
        let layout = Layout::new(root.path());
        let target = layout.rename_path();
        assert!(!target.exists());
        layout.ensure(&target).unwrap();
        assert!(target.is_dir());
        // Second call is a no-op.
        layout.ensure(&target).unwrap();
    }
}
