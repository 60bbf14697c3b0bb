//! Object sinks of the command line tool.

use std::path::{Path, PathBuf};

use pbk_core::{ObjectSink, OutputObject, SinkError};
use pbk_dicom::{encode, write_part10};
use tracing::debug;

/// Writes every object as a Part 10 file into one directory.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    /// Creates the sink and its output directory.
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ObjectSink for FileSink {
    fn accept(&mut self, object: OutputObject) -> Result<(), SinkError> {
        let path = self.dir.join(&object.file_name);
        write_part10(&object.dataset, &path)?;
        self.written.push(path);
        Ok(())
    }
}

/// Encodes every object without writing it, so a dry run still catches
/// objects the encoder would reject.
#[derive(Debug, Default)]
pub struct DryRunSink {
    encoded: usize,
}

impl DryRunSink {
    pub fn encoded(&self) -> usize {
        self.encoded
    }
}

impl ObjectSink for DryRunSink {
    fn accept(&mut self, object: OutputObject) -> Result<(), SinkError> {
        encode(&object.dataset)?;
        debug!(file = %object.file_name, "dry run, not written");
        self.encoded += 1;
        Ok(())
    }
}
