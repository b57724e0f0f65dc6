//! JSON lines output

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::DirectoryError;
use crate::tree::{EntryKind, ScanSummary, StreamingOutput, TreeLine};

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Begin {
        root: &'a Path,
    },
    Entry {
        depth: usize,
        kind: EntryKind,
        name: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<&'a str>,
    },
    Error {
        path: &'a Path,
        message: String,
    },
    Finish(&'a ScanSummary),
}

/// Writes one JSON object per event, one per line.
pub struct JsonLinesFormatter<W: Write> {
    writer: W,
}

impl JsonLinesFormatter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &Event<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        writeln!(self.writer)
    }
}

impl<W: Write> StreamingOutput for JsonLinesFormatter<W> {
    fn begin(&mut self, root: &Path) -> io::Result<()> {
        self.emit(&Event::Begin { root })
    }

    fn output_line(&mut self, line: &TreeLine<'_>) -> io::Result<()> {
        self.emit(&Event::Entry {
            depth: line.depth,
            kind: line.kind,
            name: line.name,
            label: line.label,
        })
    }

    fn output_error(&mut self, error: &DirectoryError) -> io::Result<()> {
        self.emit(&Event::Error {
            path: &error.path,
            message: error.source.to_string(),
        })
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        self.emit(&Event::Finish(summary))?;
        self.writer.flush()
    }
}
