//! I/O handling
//!
//! Output characters collect into a line that is emitted on newline. Input is
//! read one line at a time; each completed line is archived into the command
//! history before the VM decides whether it is a debug command or program
//! input.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Cursor, Write};
use synacor_spec::NEWLINE;

pub struct IOHandler {
    input: Box<dyn BufRead>,
    console: Box<dyn Write>,
    pending: VecDeque<u16>,
    output_line: String,
    pending_line: Option<Vec<u8>>,
    history: Vec<String>,
    transcript: Vec<String>,
    reports: Vec<String>,
}

impl IOHandler {
    pub fn new(input: impl BufRead + 'static, console: impl Write + 'static) -> Self {
        IOHandler {
            input: Box::new(input),
            console: Box::new(console),
            pending: VecDeque::new(),
            output_line: String::new(),
            pending_line: None,
            history: Vec::new(),
            transcript: Vec::new(),
            reports: Vec::new(),
        }
    }

    /// Interactive terminal
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    /// Fixed input with console output discarded
    pub fn scripted(input: impl Into<String>) -> Self {
        Self::new(Cursor::new(input.into().into_bytes()), io::sink())
    }

    /// Clear accumulators, pending input, history and transcripts
    pub fn reset(&mut self) {
        self.pending.clear();
        self.output_line.clear();
        self.pending_line = None;
        self.history.clear();
        self.transcript.clear();
        self.reports.clear();
    }

    /// Append one character to the output line; newline emits the line
    pub fn write_char(&mut self, code: u16) -> io::Result<()> {
        if code == NEWLINE {
            let line = std::mem::take(&mut self.output_line);
            writeln!(self.console, "{}", line)?;
            self.console.flush()?;
            self.transcript.push(line);
        } else {
            let ch = char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
            self.output_line.push(ch);
        }
        Ok(())
    }

    /// Emit any unterminated output line
    pub fn flush_output(&mut self) -> io::Result<()> {
        if !self.output_line.is_empty() {
            self.write_char(NEWLINE)?;
        }
        Ok(())
    }

    /// Emit a debug console line
    pub fn report(&mut self, line: impl Into<String>) -> io::Result<()> {
        let line = line.into();
        writeln!(self.console, "{}", line)?;
        self.console.flush()?;
        self.reports.push(line);
        Ok(())
    }

    /// Next queued character of a delivered line
    pub fn next_pending(&mut self) -> Option<u16> {
        self.pending.pop_front()
    }

    /// Read characters up to the next newline
    ///
    /// The completed line is archived into the history and returned without
    /// its newline. A final line without a newline still completes. Returns
    /// `None` once the input is exhausted.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        let line = String::from_utf8_lossy(&bytes).into_owned();
        self.history.push(line.clone());
        self.pending_line = Some(bytes);
        Ok(Some(line))
    }

    /// Queue the last completed line, plus its newline, for the program
    pub fn deliver_line(&mut self) {
        if let Some(bytes) = self.pending_line.take() {
            self.pending.extend(bytes.into_iter().map(u16::from));
            self.pending.push_back(NEWLINE);
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Lines emitted by the program
    pub fn output_lines(&self) -> &[String] {
        &self.transcript
    }

    /// Lines emitted by the debug console
    pub fn reports(&self) -> &[String] {
        &self.reports
    }

    /// Output characters not yet terminated by a newline
    pub fn pending_output(&self) -> &str {
        &self.output_line
    }
}

impl Default for IOHandler {
    fn default() -> Self {
        Self::scripted(String::new())
    }
}

impl std::fmt::Debug for IOHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IOHandler")
            .field("pending", &self.pending)
            .field("output_line", &self.output_line)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
