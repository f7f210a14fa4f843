//! Messages posted from the viewer to the hosting editor.
//!
//! The host reads one JSON object per line. The only message type is
//! `openDocument`, sent whenever the selected row has a source location.

use std::fs::OpenOptions;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::{HostConfig, HostOutput};
use crate::listing::SourceLocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Ask the host to open `file` and reveal `line`
    OpenDocument { file: String, line: u32 },
}

impl HostMessage {
    pub fn open_document(location: &SourceLocation) -> Self {
        HostMessage::OpenDocument {
            file: location.file.clone(),
            line: location.line,
        }
    }
}

/// Destination for host messages
pub trait HostSink {
    fn post(&mut self, message: &HostMessage) -> crate::Result<()>;
}

/// Writes each message as a single JSON line and flushes immediately
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostSink for JsonLinesSink<W> {
    fn post(&mut self, message: &HostMessage) -> crate::Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl HostSink for NullSink {
    fn post(&mut self, _message: &HostMessage) -> crate::Result<()> {
        Ok(())
    }
}

/// Build the sink selected by `[host] output`
pub fn open_sink(config: &HostConfig) -> crate::Result<Box<dyn HostSink>> {
    open_output(config.output())
}

/// Build the sink for an already resolved output
pub fn open_output(output: HostOutput) -> crate::Result<Box<dyn HostSink>> {
    match output {
        HostOutput::Stdout => Ok(Box::new(JsonLinesSink::new(std::io::stdout()))),
        HostOutput::Disabled => Ok(Box::new(NullSink)),
        HostOutput::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing::info!("Posting host messages to {}", path.display());
            Ok(Box::new(JsonLinesSink::new(file)))
        }
    }
}
