use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::types::Document;

/// Loads `.txt` files from a directory tree into `Document`s.
///
/// The document id is the file stem, `category` is the parent directory
/// relative to the root (`"misc"` for top-level files) and `path` is the file path.
#[derive(Default)]
pub struct DataProcessor {
    limit: Option<usize>,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    /// Stop after the first `limit` files (in sorted order).
    pub fn with_limit(limit: usize) -> Self { Self { limit: Some(limit) } }

    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<Document>> {
        let mut files = self.list_txt_files(data_dir);
        if files.is_empty() {
            info!("No .txt files found under {}", data_dir.display());
            return Ok(vec![]);
        }
        if let Some(limit) = self.limit {
            if files.len() > limit { files.truncate(limit); info!("Limited to first {} files", limit); }
        }
        let mut docs = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!("Loading file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let content = self.read_file_content(file_path)?;
            let doc = Document::new(self.extract_doc_id(file_path), content)
                .with_meta("category", self.get_facet_from_path(file_path, data_dir))
                .with_meta("path", file_path.to_string_lossy().to_string());
            docs.push(doc);
        }
        info!("Loaded {} documents from {}", docs.len(), data_dir.display());
        Ok(docs)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_doc_id(&self, file_path: &Path) -> String {
        file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default()
    }

    fn get_facet_from_path(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        match relative_path.parent().and_then(|p| p.to_str()) {
            Some(facet) if !facet.is_empty() => facet.to_string(),
            _ => "misc".to_string(),
        }
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
