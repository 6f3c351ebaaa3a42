//! Decides how a file is shown and loads its text.

use std::{fs, path::Path};

use tracing::error;

use crate::language::{self, PLAINTEXT};

/// Files above this many bytes are never read.
pub const MAX_FILE_SIZE: u64 = 1_000_000;

/// What the file view shows in place of (or as) the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Text,
    TooLarge,
    Binary { mime: String },
    Unreadable,
}

#[derive(Debug, Clone)]
pub struct FileView {
    pub name: String,
    pub kind: FileKind,
    /// Decoded text for [`FileKind::Text`], a short placeholder otherwise.
    pub content: String,
    pub language: &'static str,
    pub size: u64,
    pub line_count: usize,
}

impl FileView {
    fn placeholder(name: String, kind: FileKind, message: String, size: u64) -> Self {
        Self {
            name,
            kind,
            content: message,
            language: PLAINTEXT,
            size,
            line_count: 0,
        }
    }
}

/// Newline-delimited lines, counting a trailing partial line.
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}

/// True when the name-based MIME guess says the file is not text.
///
/// Unknown types, `text/*` and JSON are text, as is anything the language
/// table knows, since some source extensions guess as `application/*`.
fn guess_binary(name: &str, path: &Path) -> Option<String> {
    let mime = mime_guess::from_path(path).first()?;
    if mime.type_() == mime_guess::mime::TEXT || mime.essence_str() == "application/json" {
        return None;
    }
    if language::classify(name) != PLAINTEXT {
        return None;
    }
    Some(mime.essence_str().to_string())
}

/// Builds the view for the file at `path`. Never fails; problems become
/// placeholder views.
pub fn render_file(path: &Path) -> FileView {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            error!("Failed to get metadata for {}: {}", path.display(), e);
            return FileView::placeholder(
                name,
                FileKind::Unreadable,
                "Unable to read file.".to_string(),
                0,
            );
        }
    };

    if size > MAX_FILE_SIZE {
        return FileView::placeholder(
            name,
            FileKind::TooLarge,
            "File too large to display.".to_string(),
            size,
        );
    }

    if let Some(mime) = guess_binary(&name, path) {
        let message = format!("Binary file ({mime})");
        return FileView::placeholder(name, FileKind::Binary { mime }, message, size);
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read file {}: {}", path.display(), e);
            return FileView::placeholder(
                name,
                FileKind::Unreadable,
                "Unable to read file.".to_string(),
                size,
            );
        }
    };

    let content = String::from_utf8_lossy(&bytes).into_owned();
    let line_count = count_lines(&content);
    let language = language::classify(&name);
    FileView {
        name,
        kind: FileKind::Text,
        content,
        language,
        size,
        line_count,
    }
}
