//! Newline-delimited JSON transport.
//!
//! Each message is one compact JSON object followed by `\n`. Messages never
//! contain embedded newlines.

use std::io::{BufRead, BufReader, BufWriter, Stdin, Stdout, Write};

use crate::StratusResult;

use super::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Line transport over any reader/writer pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

impl LineTransport<BufReader<Stdin>, BufWriter<Stdout>> {
    /// Transport over the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(
            BufReader::new(std::io::stdin()),
            BufWriter::new(std::io::stdout()),
        )
    }
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next request.
    ///
    /// Blank lines are skipped. Returns `Ok(None)` at end of input and a
    /// JSON error for a line that is not a valid request.
    pub fn read_message(&mut self) -> StratusResult<Option<JsonRpcRequest>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = serde_json::from_str(trimmed)?;
            tracing::debug!(method = %request.method, id = ?request.id, "Received request");
            return Ok(Some(request));
        }
    }

    /// Writes one response line and flushes.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> StratusResult<()> {
        let body = serde_json::to_string(response)?;

        self.writer.write_all(body.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        tracing::debug!(id = ?response.id, is_error = response.is_error(), "Sent response");
        Ok(())
    }

    /// Gives back the writer, e.g. to inspect buffered output in tests.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
