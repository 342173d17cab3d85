use crate::models::ReferenceFile;

pub const MAX_REFERENCE_FILES: usize = 5;

/// Ordered list of reference files, never longer than [`MAX_REFERENCE_FILES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentList {
    files: Vec<ReferenceFile>,
}

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `files`, then keep only the first [`MAX_REFERENCE_FILES`] of the
    /// combined list. Returns how many of the new files were kept.
    pub fn add(&mut self, files: impl IntoIterator<Item = ReferenceFile>) -> usize {
        let before = self.files.len();
        self.files.extend(files);
        self.files.truncate(MAX_REFERENCE_FILES);
        self.files.len().saturating_sub(before)
    }

    /// Remove the entry at `index`. Out-of-range indices change nothing.
    pub fn remove(&mut self, index: usize) -> Option<ReferenceFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.files.len() >= MAX_REFERENCE_FILES
    }

    pub fn files(&self) -> &[ReferenceFile] {
        &self.files
    }

    pub fn previews(&self) -> Vec<String> {
        self.files.iter().map(ReferenceFile::preview_url).collect()
    }
}
