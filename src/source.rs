use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

/// A loaded source file with a lazily built table of line starts.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_starts: OnceCell<Vec<usize>>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            line_starts: OnceCell::new(),
        }
    }

    pub fn load(path: PathBuf) -> io::Result<Self> {
        let text = fs::read_to_string(&path)?;

        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn line_starts(&self) -> &[usize] {
        self.line_starts.get_or_init(|| {
            std::iter::once(0)
                .chain(self.text.match_indices('\n').map(|(idx, _)| idx + 1))
                .collect()
        })
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    /// Returns the text of the 0-based line `line` without its line terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let starts = self.line_starts();
        let start = *starts.get(line)?;
        let end = starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.text.len());

        Some(&self.text[start..end])
    }
}
