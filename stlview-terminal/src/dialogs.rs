/// Native file dialogs for import and share
use std::path::{Path, PathBuf};

/// Document-picker analog: choose an STL file to import into the catalog.
/// Returns `None` when the user cancels.
pub fn pick_import_source() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("STL Model", &["stl"])
        .pick_file()
}

/// Share-sheet analog: choose where to write a copy of the current model.
pub fn pick_share_destination(file_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("STL Model", &["stl"])
        .set_file_name(file_name)
        .save_file()
}

/// Copy the shared file to the chosen destination. No transformation.
pub fn export_copy(source: &Path, dest: &Path) -> std::io::Result<u64> {
    std::fs::copy(source, dest)
}
