//! Destinations for the rendered spec report.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Where [`SpecRunner::emit`](crate::runner::SpecRunner::emit) writes the report.
pub enum ReportSink {
    Stdout,
    Writer(Box<dyn Write>),
}

impl ReportSink {
    /// Write into a shared in-memory buffer the caller can read back.
    pub fn captured(output: &CapturedOutput) -> Self {
        ReportSink::Writer(Box::new(output.clone()))
    }

    pub fn write_report(&mut self, report: &str) -> io::Result<()> {
        match self {
            ReportSink::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(report.as_bytes())?;
                handle.flush()
            }
            ReportSink::Writer(writer) => {
                writer.write_all(report.as_bytes())?;
                writer.flush()
            }
        }
    }
}

impl Default for ReportSink {
    fn default() -> Self {
        ReportSink::Stdout
    }
}

impl fmt::Debug for ReportSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportSink::Stdout => f.write_str("Stdout"),
            ReportSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Cloneable in-memory writer; every clone shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
