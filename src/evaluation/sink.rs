use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Transcription;

/// Append-only destination for per-sample results, written as each sample
/// completes.
pub trait TranscriptionSink: Send {
    fn record(&mut self, transcription: &Transcription) -> Result<()>;
}

impl TranscriptionSink for Vec<Transcription> {
    fn record(&mut self, transcription: &Transcription) -> Result<()> {
        self.push(transcription.clone());
        Ok(())
    }
}

/// JSON Lines run log, flushed after every record so an aborted run leaves
/// everything completed so far on disk.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl RunLog {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create run log directory")?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create run log {}", path.display()))?;

        debug!("Writing run log to {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Close and delete the log.
    pub fn remove(self) -> Result<()> {
        let path = self.path;
        drop(self.writer);
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove run log {}", path.display()))
    }
}

impl TranscriptionSink for RunLog {
    fn record(&mut self, transcription: &Transcription) -> Result<()> {
        serde_json::to_writer(&mut self.writer, transcription)
            .context("Failed to serialize run log record")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush().context("Failed to write run log")?;
        self.records += 1;
        Ok(())
    }
}
