//! Generated File Persistence
//!
//! The file-writer seam used by the generate-file action. Failures are
//! reported to the user and never abort the session.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// A collaborator that persists generated content
pub trait FileWriter {
    /// Write `content` to the file named `name`
    fn write(&mut self, name: &str, content: &str) -> Result<()>;
}

/// Writes generated files relative to the assistant's working directory.
// TODO: resolve the target path against the shell session's current
// directory once the session exposes it; `cd` inside the shell does not move
// where generated files land.
#[derive(Debug, Default)]
pub struct DiskFileWriter;

impl FileWriter for DiskFileWriter {
    fn write(&mut self, name: &str, content: &str) -> Result<()> {
        std::fs::write(name, content).map_err(|e| Error::FileSaveFailed {
            path: PathBuf::from(name),
            reason: e.to_string(),
        })
    }
}
