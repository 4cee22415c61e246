use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::file_utils::FileManager;

/// Writes parity-mismatch payloads to disk for offline inspection.
///
/// Each dump records the attempt number plus the full input and output
/// text arrays, so a mismatched batch can be replayed against the provider
/// by hand. Dumps are advisory: a failed write is logged by the caller and
/// never aborts a translation.
#[derive(Debug)]
pub struct DiagnosticsWriter {
    /// Directory receiving dump files
    dir: PathBuf,
    /// Monotonic dump counter, keeps filenames unique within a run
    counter: AtomicUsize,
}

/// Serialized dump payload
#[derive(Debug, Serialize)]
struct MismatchDump<'a> {
    attempt: u32,
    expected: usize,
    actual: usize,
    texts: &'a [String],
    translated: &'a [String],
    recorded_at: String,
}

impl DiagnosticsWriter {
    /// Create a writer targeting the given directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            counter: AtomicUsize::new(0),
        }
    }

    /// Persist one parity mismatch and return the dump path
    pub fn record_parity_mismatch(
        &self,
        attempt: u32,
        texts: &[String],
        translated: &[String],
    ) -> Result<PathBuf> {
        let dump = MismatchDump {
            attempt,
            expected: texts.len(),
            actual: translated.len(),
            texts,
            translated,
            recorded_at: Local::now().to_rfc3339(),
        };

        let sequence = self.counter.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!(
            "parity-mismatch-{}-{}.json",
            sequence,
            Local::now().format("%Y%m%d%H%M%S")
        ));

        FileManager::write_to_file(&path, &serde_json::to_string_pretty(&dump)?)?;
        Ok(path)
    }
}
