/// File catalog over the app-private model directory
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ViewerError;

const MODEL_EXTENSION: &str = "stl";

/// Reference to an on-disk mesh file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    path: PathBuf,
    name: String,
}

impl ModelFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered list of the `.stl` files in one directory.
///
/// Scans sort by file name, case-insensitive, so the order is stable across
/// platforms. Imports append to the list in pick order.
#[derive(Debug)]
pub struct Catalog {
    dir: PathBuf,
    files: Vec<ModelFile>,
}

impl Catalog {
    /// Open the catalog directory, creating it if missing, and scan it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ViewerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ViewerError::io(&dir, e))?;

        let mut catalog = Self {
            dir,
            files: Vec::new(),
        };
        catalog.scan()?;
        Ok(catalog)
    }

    /// Re-list the directory, replacing the in-memory file list.
    pub fn scan(&mut self) -> Result<(), ViewerError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| ViewerError::io(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ViewerError::io(&self.dir, e))?;
            let path = entry.path();
            if has_model_extension(&path) && path.is_file() {
                files.push(ModelFile::new(path));
            }
        }
        files.sort_by(|a, b| {
            a.name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase())
        });

        self.files = files;
        Ok(())
    }

    /// Copy a user-picked file into the catalog directory under its original
    /// name and append it to the list. A name collision silently overwrites
    /// the file on disk; the list still grows by one entry.
    pub fn import(&mut self, source: &Path) -> Result<ModelFile, ViewerError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| {
                ViewerError::io(
                    source,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
                )
            })?
            .to_owned();

        let dest = self.dir.join(file_name);
        fs::copy(source, &dest).map_err(|e| ViewerError::io(&dest, e))?;
        log::info!("imported {} into {}", source.display(), self.dir.display());

        let file = ModelFile::new(dest);
        self.files.push(file.clone());
        Ok(file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ModelFile> {
        self.files.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelFile> {
        self.files.iter()
    }

    /// Path handed to the share/export collaborator. No transformation.
    pub fn share_path(&self, index: usize) -> Option<&Path> {
        self.files.get(index).map(|f| f.path())
    }
}

fn has_model_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(MODEL_EXTENSION))
        .unwrap_or(false)
}
