//! JSONL transcript log.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type`, `seq`
//! and `timestamp` next to the event payload. Batch runs share one file, so
//! turn records also carry the `pair` label set by the use case.

use matchmaker_application::{ConversationEvent, ConversationLogger};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<Sink>,
    path: PathBuf,
}

struct Sink {
    out: BufWriter<File>,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the log file at `path`.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; the caller then runs without a transcript log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Open `path` for appending, keeping records from earlier runs.
    pub fn append(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Option<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path);
        let file = match file {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(Sink {
                out: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::String(event.event_type.to_string()));
            map.insert("seq".to_string(), Value::from(seq));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        }
        other => json!({
            "type": event.event_type,
            "seq": seq,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.writer.lock() else {
            return;
        };
        let line = match serde_json::to_string(&record(event, sink.seq)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Dropping unserializable conversation event: {}", e);
                return;
            }
        };
        sink.seq += 1;
        if let Err(e) = writeln!(sink.out, "{}", line).and_then(|_| sink.out.flush()) {
            warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.writer.lock() {
            let _ = sink.out.flush();
        }
    }
}
