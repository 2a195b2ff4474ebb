use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::events::{EventListener, GameEvent};

#[derive(Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    event: &'a GameEvent,
}

/// Writes game events as JSON lines (LF only), each stamped with an RFC3339 `ts`.
pub struct EventLogger<W: Write> {
    writer: BufWriter<W>,
    written: u64,
}

impl EventLogger<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> EventLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write(&mut self, event: &GameEvent) -> std::io::Result<()> {
        let line = Line {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            event,
        };
        let json = serde_json::to_string(&line).map_err(std::io::Error::other)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn into_inner(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write + Send + 'static> EventLogger<W> {
    /// Wraps the logger as an engine listener. Write failures are logged, not raised.
    pub fn into_listener(self) -> EventListener {
        let logger = Mutex::new(self);
        Box::new(move |event| {
            let Ok(mut guard) = logger.lock() else {
                tracing::warn!("event logger poisoned; dropping event");
                return;
            };
            if let Err(err) = guard.write(event) {
                tracing::warn!(error = %err, "failed to write game event");
            }
        })
    }
}
