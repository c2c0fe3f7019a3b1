//! Output sinks for flushed wide log lines.
//!
//! Flushing is the only place the logger talks to the outside world, and it
//! does so through [`LogSink`]. Production code writes to stdout; tests hand
//! the logger a [`MemorySink`] and read the captured lines back.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for rendered lines.
///
/// `line` never contains the trailing newline; the sink terminates it.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

impl<S> LogSink for Arc<S>
where
    S: LogSink + ?Sized,
{
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

impl<S> LogSink for Box<S>
where
    S: LogSink + ?Sized,
{
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Writes each line to the process's standard output.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Writes each line to an arbitrary `io::Write` (file, stderr, buffer).
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("writer sink lock poisoned"))?;
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

/// In-memory sink for tests/dev.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to the logger.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<String> {
        self.lines().pop()
    }

    /// Drain the buffer, returning what it held.
    pub fn take(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?;
        lines.push(line.to_string());
        Ok(())
    }
}
