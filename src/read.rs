// src/read.rs
use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    time::{Duration, Instant},
};
use tracing::{info, instrument, warn};

use crate::process::{strategy::ExecutionStrategy, Header, RawLine, Record, RowError};

/// Library-side knobs for a read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Worker threads for the parallel strategy; 0 means one per logical CPU.
    pub threads: usize,
}

impl ReadOptions {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// Outcome of reading one file with one strategy.
#[derive(Debug)]
pub struct ReadReport {
    pub header: Header,
    /// Successfully parsed rows. File order for the sequential strategy.
    pub records: Vec<Record>,
    /// Data lines seen, excluding the header.
    pub rows_read: usize,
    /// Rows dropped because of a row-level error.
    pub rows_dropped: usize,
    pub elapsed: Duration,
}

/// Read the header and every data line of `path`.
///
/// The header must be valid UTF-8; data lines are kept as raw bytes so a bad
/// line only costs its own row later on. `\n` and `\r\n` terminators are
/// stripped.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<(Header, Vec<RawLine>)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("File {} can not be found", path.display()))?;
    read_lines_from(BufReader::new(file))
        .with_context(|| format!("Problem encountered reading file {}", path.display()))
}

/// Same as [`read_lines`] over any buffered reader.
pub fn read_lines_from<R: BufRead>(reader: R) -> Result<(Header, Vec<RawLine>)> {
    let mut chunks = reader.split(b'\n');

    let first = chunks
        .next()
        .ok_or_else(|| anyhow!("missing header line"))?
        .context("reading header line")?;
    let header_text = String::from_utf8(strip_cr(first)).context("header line is not UTF-8")?;
    let header = Header::parse(&header_text);

    let mut lines = Vec::new();
    for (idx, chunk) in chunks.enumerate() {
        let number = idx + 2;
        let bytes = chunk.with_context(|| format!("reading line {}", number))?;
        lines.push(RawLine::new(number, strip_cr(bytes)));
    }
    Ok((header, lines))
}

fn strip_cr(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    bytes
}

/// Read `path` and turn every data line into a record with `strategy`.
///
/// Row-level failures are logged and counted, never returned. Only file-level
/// problems (missing, unreadable, no header) make this fail.
#[instrument(level = "info", skip(path, strategy), fields(path = %path.as_ref().display(), strategy = strategy.name()))]
pub fn read_file<P: AsRef<Path>>(path: P, strategy: &dyn ExecutionStrategy) -> Result<ReadReport> {
    let start = Instant::now();
    info!("starting read");
    let (header, lines) = read_lines(&path)?;
    let report = collect(header, &lines, strategy, start);
    info!(
        rows = report.rows_read,
        records = report.records.len(),
        dropped = report.rows_dropped,
        elapsed = ?report.elapsed,
        "read complete"
    );
    Ok(report)
}

/// Run `strategy` over `lines` and keep only the rows that parsed.
pub fn collect(
    header: Header,
    lines: &[RawLine],
    strategy: &dyn ExecutionStrategy,
    start: Instant,
) -> ReadReport {
    let results = strategy.process(&header, lines);

    let mut records = Vec::with_capacity(results.len());
    let mut rows_dropped = 0;
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                log_dropped(&err);
                rows_dropped += 1;
            }
        }
    }

    ReadReport {
        header,
        records,
        rows_read: lines.len(),
        rows_dropped,
        elapsed: start.elapsed(),
    }
}

fn log_dropped(err: &RowError) {
    warn!(line = err.line(), error = %err, "dropping row");
}
