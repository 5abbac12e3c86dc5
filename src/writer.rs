use std::fmt::Display;
use std::io::{self, Stderr, Stdout, Write};

/// Where command output goes. Codes and listings on `write`, diagnostics on
/// `write_err`, so a caller can pipe stdout without seeing error text.
pub trait OutErr {
    fn write_err(&mut self, s: &str);
    fn write(&mut self, s: &str);

    /// Reports `err` as a failed command. Returns false, the command's status.
    fn fail<E: Display>(&mut self, err: E) -> bool
    where
        Self: Sized,
    {
        self.write_err(&format!("Error: {}\n", err));
        false
    }
}

pub struct VaultWriter<O: Write = Stdout, E: Write = Stderr> {
    out: O,
    err: E,
}

impl VaultWriter {
    pub fn new() -> Self {
        VaultWriter::with_streams(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> VaultWriter<O, E> {
    pub fn with_streams(out: O, err: E) -> Self {
        VaultWriter { out, err }
    }

    #[cfg(test)]
    pub fn into_streams(self) -> (O, E) {
        (self.out, self.err)
    }
}

// failures are logged, never propagated
fn write_flushed(stream: &mut impl Write, s: &str) -> io::Result<()> {
    stream.write_all(s.as_bytes())?;
    stream.flush()
}

impl<O: Write, E: Write> OutErr for VaultWriter<O, E> {
    fn write_err(&mut self, s: &str) {
        if let Err(e) = write_flushed(&mut self.err, s) {
            log::error!("unable to write to stderr: {}", e);
        }
    }

    fn write(&mut self, s: &str) {
        if let Err(e) = write_flushed(&mut self.out, s) {
            log::error!("unable to write to stdout: {}", e);
        }
    }
}
