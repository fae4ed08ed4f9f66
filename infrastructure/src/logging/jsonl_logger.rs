//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type`,
//! `seq` (0-based order within the run) and an RFC 3339 `timestamp`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use workbench_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`; the sequence number is assigned under the same
/// lock as the write so lines are numbered in file order.
pub struct JsonlConversationLogger {
    inner: Mutex<Inner>,
    path: PathBuf,
}

struct Inner {
    writer: BufWriter<File>,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Create a logger writing to `path`, truncating an existing file.
    ///
    /// Parent directories are created as needed.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent, seq: u64) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let header = [
            ("type", serde_json::json!(event.event_type)),
            ("seq", serde_json::json!(seq)),
            ("timestamp", serde_json::json!(timestamp)),
        ];

        match event.payload {
            serde_json::Value::Object(mut map) => {
                for (key, value) in header {
                    map.insert(key.to_string(), value);
                }
                serde_json::Value::Object(map)
            }
            other => {
                let mut map: serde_json::Map<String, serde_json::Value> = header
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                map.insert("data".to_string(), other);
                serde_json::Value::Object(map)
            }
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        let event_type = event.event_type;
        let record = Self::record(event, inner.seq);
        inner.seq += 1;

        if let Err(e) = write_line(&mut inner.writer, &record) {
            warn!(
                event = event_type,
                path = %self.path.display(),
                "Could not write conversation log: {}",
                e
            );
        }
    }
}

/// One line per event; flushed so a crash still leaves a readable prefix.
fn write_line(writer: &mut BufWriter<File>, record: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}
