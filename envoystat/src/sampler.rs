//! The sampling loop.
//!
//! One tick fetches a snapshot, diffs it against the previous one and writes a
//! row. Ticks are spaced by the configured interval measured from the start of
//! each tick, so request latency eats into the sleep rather than stretching
//! the cadence. A tick that overruns the interval is followed immediately by
//! the next one.
//!
//! Shutdown is requested through a [`CancellationToken`] and only observed
//! after the end-of-tick sleep; an in-flight fetch is never interrupted.
use std::{io::Write, time::Duration};

use admin_stats::SnapshotSource;
use chrono::Local;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::FetchFailurePolicy,
    error::SampleError,
    fields::FieldSpec,
    history::{Row, SnapshotHistory},
    render,
};

/// The header row is repeated every this many ticks
pub const HEADER_EVERY: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// No baseline yet
    Priming,
    Sampling,
    /// Shutdown observed, writing the trailer
    Draining,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerSummary {
    pub rows: u64,
    pub skipped: u64,
}

pub struct Sampler<S, W> {
    source: S,
    out: W,
    fields: Vec<FieldSpec>,
    interval: Duration,
    policy: FetchFailurePolicy,
    history: SnapshotHistory,
    state: SamplerState,
    tick: u32,
    header_written: bool,
    summary: SamplerSummary,
}

impl<S, W> Sampler<S, W>
where
    S: SnapshotSource,
    W: Write,
{
    pub fn new(
        source: S,
        out: W,
        fields: Vec<FieldSpec>,
        interval: Duration,
        policy: FetchFailurePolicy,
    ) -> Self {
        Self {
            source,
            out,
            fields,
            interval,
            policy,
            history: SnapshotHistory::new(),
            state: SamplerState::Priming,
            tick: 0,
            header_written: false,
            summary: SamplerSummary::default(),
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn summary(&self) -> SamplerSummary {
        self.summary
    }

    /// Run until `shutdown` is cancelled, or until a tick fails under
    /// [`FetchFailurePolicy::Abort`].
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<SamplerSummary, SampleError> {
        loop {
            let tick_start = Instant::now();

            self.tick().await?;

            let elapsed = tick_start.elapsed();
            match self.interval.checked_sub(elapsed) {
                Some(remaining) if !remaining.is_zero() => sleep(remaining).await,
                _ => debug!(
                    "Tick took {:?}, longer than the {:?} interval; not sleeping",
                    elapsed, self.interval
                ),
            }

            if shutdown.is_cancelled() {
                return self.drain();
            }
        }
    }

    /// Execute one tick: optional header, fetch, diff and row output.
    pub async fn tick(&mut self) -> Result<(), SampleError> {
        if self.tick % HEADER_EVERY == 0 && !self.header_written {
            let line = render::header_line(&Local::now().naive_local(), &self.fields);
            writeln!(self.out, "{}", line)?;
            self.header_written = true;
        }

        match self.sample().await {
            Ok(Some(row)) => {
                let line = render::row_line(&Local::now().naive_local(), &row);
                writeln!(self.out, "{}", line)?;
                self.out.flush()?;
                self.summary.rows += 1;
                self.advance();
                Ok(())
            }
            Ok(None) => {
                debug!("Baseline snapshot captured");
                self.advance();
                Ok(())
            }
            Err(SampleError::Output(e)) => Err(SampleError::Output(e)),
            Err(e) => self.handle_failure(e),
        }
    }

    async fn sample(&mut self) -> Result<Option<Row>, SampleError> {
        let current = self.source.fetch_snapshot().await?;
        debug!("Fetched snapshot with {} metrics", current.len());

        let row = self.history.record(current, &self.fields);
        if self.history.is_primed() && self.state == SamplerState::Priming {
            self.state = SamplerState::Sampling;
        }
        row
    }

    fn handle_failure(&mut self, error: SampleError) -> Result<(), SampleError> {
        // The snapshot itself was good and is now the baseline
        if matches!(error, SampleError::MissingBaseline { .. }) {
            self.advance();
        }

        match self.policy {
            FetchFailurePolicy::Abort => Err(error),
            FetchFailurePolicy::Skip => {
                warn!("Skipping tick: {}", error);
                let line = render::error_line(&Local::now().naive_local(), &error);
                writeln!(self.out, "{}", line)?;
                self.out.flush()?;
                self.summary.skipped += 1;
                Ok(())
            }
        }
    }

    fn advance(&mut self) {
        self.tick = (self.tick + 1) % HEADER_EVERY;
        self.header_written = false;
    }

    fn drain(&mut self) -> Result<SamplerSummary, SampleError> {
        self.state = SamplerState::Draining;
        writeln!(self.out)?;
        self.out.flush()?;
        info!(
            "Sampling stopped after {} rows ({} ticks skipped)",
            self.summary.rows, self.summary.skipped
        );
        Ok(self.summary)
    }
}
