//! Mailmap construction for `git filter-repo --mailmap`.
//!
//! A mailmap line maps a commit identity to a canonical one. Two forms are
//! used here:
//!
//! ```text
//! New Name <new@example.com> <old@example.com>            # match by email
//! New Name <new@example.com> Old Name <old@example.com>   # match by name+email
//! ```

use std::io::Write;

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::rewrite::Identity;

/// An in-memory mailmap, one entry per rewritten identity.
#[derive(Debug, Default)]
pub struct Mailmap {
    entries: Vec<String>,
}

impl Mailmap {
    /// Create an empty mailmap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every commit with `old_email` to `new`, regardless of name.
    pub fn map_email(&mut self, new: &Identity, old_email: &str) {
        self.entries
            .push(format!("{} <{}> <{}>", new.name, new.email, old_email));
    }

    /// Map the exact `old_name <old_email>` pair to `new`.
    pub fn map_identity(&mut self, new: &Identity, old_name: &str, old_email: &str) {
        self.entries.push(format!(
            "{} <{}> {} <{}>",
            new.name, new.email, old_name, old_email
        ));
    }

    /// Whether any entries have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the mailmap file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    /// Write the mailmap to a temp file consumed by `git filter-repo`.
    ///
    /// The file lives as long as the returned handle; keep it alive for the
    /// duration of the filter-repo run.
    ///
    /// # Errors
    /// Returns an error if the temp file cannot be created or written.
    pub fn write_temp(&self) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("gitauth-mailmap-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(self.render().as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}
