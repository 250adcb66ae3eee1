use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{AppError, AppResult, SinkError};
use crate::stats::{BucketSnapshot, IntervalSnapshot};

/// One line of the report file, tagged by `kind`.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportRecord<'snapshot> {
    Interval(&'snapshot IntervalSnapshot),
    Window(&'snapshot BucketSnapshot),
}

/// Appends interval and window snapshots to a file, one JSON object per line.
#[derive(Debug)]
pub struct ReportSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub async fn open(path: &Path) -> AppResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|err| {
                AppError::sink(SinkError::Open {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?;
        tracing::debug!("Writing report lines to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be serialized or written.
    pub async fn write_interval(&mut self, snapshot: &IntervalSnapshot) -> AppResult<()> {
        self.write_record(&ReportRecord::Interval(snapshot)).await
    }

    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be serialized or written.
    pub async fn write_window(&mut self, snapshot: &BucketSnapshot) -> AppResult<()> {
        self.write_record(&ReportRecord::Window(snapshot)).await
    }

    /// Serializes one record and flushes it, so readers tailing the file see
    /// whole lines only.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub async fn write_record(&mut self, record: &ReportRecord<'_>) -> AppResult<()> {
        let mut line = serde_json::to_vec(record).map_err(|err| {
            AppError::sink(SinkError::Serialize {
                context: "report record",
                source: err,
            })
        })?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .await
            .map_err(|err| self.write_error(err))?;
        self.writer
            .flush()
            .await
            .map_err(|err| self.write_error(err))
    }

    fn write_error(&self, err: std::io::Error) -> AppError {
        AppError::sink(SinkError::Write {
            path: self.path.clone(),
            source: err,
        })
    }
}
