// src/process/strategy.rs
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

use super::{process_line, Header, RawLine, RowResult};
use crate::read::ReadOptions;

/// How the per-line transform is scheduled. Every strategy runs the same
/// [`process_line`] and must yield the same set of results.
pub trait ExecutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, header: &Header, lines: &[RawLine]) -> Vec<RowResult>;
}

/// One line at a time, in file order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl ExecutionStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn process(&self, header: &Header, lines: &[RawLine]) -> Vec<RowResult> {
        lines.iter().map(|line| process_line(header, line)).collect()
    }
}

/// Lines fanned out over a rayon pool.
pub struct Parallel {
    pool: rayon::ThreadPool,
}

impl Parallel {
    /// `threads == 0` lets rayon pick (one per logical CPU).
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("typedcsv-worker-{}", i))
            .build()
            .context("building parallel worker pool")?;
        Ok(Self { pool })
    }

    pub fn with_options(options: &ReadOptions) -> Result<Self> {
        Self::new(options.threads)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl fmt::Debug for Parallel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parallel")
            .field("threads", &self.threads())
            .finish()
    }
}

impl ExecutionStrategy for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn process(&self, header: &Header, lines: &[RawLine]) -> Vec<RowResult> {
        debug!(threads = self.threads(), lines = lines.len(), "parallel transform");
        self.pool.install(|| {
            lines
                .par_iter()
                .map(|line| process_line(header, line))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RowError;

    fn sample() -> (Header, Vec<RawLine>) {
        let header = Header::parse("id,name,score");
        let mut lines: Vec<RawLine> = (0..500)
            .map(|i| RawLine::new(i + 2, format!("{},\"n, {}\",{}.5", i, i, i)))
            .collect();
        lines[123] = RawLine::new(125, vec![0xc3, 0x28]);
        (header, lines)
    }

    fn displays(results: &[RowResult]) -> Vec<String> {
        let mut out: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.to_string())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_sequential_keeps_file_order() {
        let (header, lines) = sample();
        let results = Sequential.process(&header, &lines);
        assert_eq!(results.len(), lines.len());
        assert_eq!(
            results[0].as_ref().unwrap().to_string(),
            "{id=0, name=n, 0, score=0.5}"
        );
        assert_eq!(results[123], Err(RowError::InvalidUtf8 { line: 125 }));
    }

    #[test]
    fn test_strategies_agree() -> Result<()> {
        let (header, lines) = sample();
        let seq = Sequential.process(&header, &lines);
        let par = Parallel::new(4)?.process(&header, &lines);

        assert_eq!(seq.len(), par.len());
        assert_eq!(displays(&seq), displays(&par));
        assert_eq!(displays(&seq).len(), lines.len() - 1);
        Ok(())
    }

    #[test]
    fn test_parallel_thread_count() -> Result<()> {
        assert_eq!(Parallel::new(3)?.threads(), 3);
        assert!(Parallel::new(0)?.threads() >= 1);
        Ok(())
    }

    #[test]
    fn test_parallel_from_read_options() -> Result<()> {
        let options = ReadOptions::default().with_threads(2);
        assert_eq!(Parallel::with_options(&options)?.threads(), 2);
        assert_eq!(ReadOptions::default().threads, 0);
        Ok(())
    }
}
