//! Per-stage percentage bars for a workflow build.
//!
//! Jenkins exposes no completion percentage, so the bar estimates each
//! stage against the duration the same stage took in the previous run
//! of the job, falling back to a fixed default when no comparable
//! reference exists.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use console::Style;

use jns_api::ApiError;
use jns_api::model::{Stage, Status};
use jns_runner::{ProgressBar, ProgressError};

pub(crate) const DEFAULT_STAGE_DURATION_MILLIS: i64 = 60_000;
const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Fetches the stage list of one build of the job being followed.
pub trait StageFetcher: Send {
    fn stages(&mut self, build_number: u32) -> Result<Vec<Stage>, ApiError>;
}

impl<F> StageFetcher for F
where
    F: FnMut(u32) -> Result<Vec<Stage>, ApiError> + Send,
{
    fn stages(&mut self, build_number: u32) -> Result<Vec<Stage>, ApiError> {
        self(build_number)
    }
}

pub struct BuildProgressBar<F: StageFetcher> {
    fetcher: F,
    build_number: u32,
    /// Stage list of the previous run, fetched once per session.
    reference_stages: Option<Vec<Stage>>,
    /// Last successfully rendered bars, reused when a refresh fails at
    /// a terminal transition.
    rendered: Vec<String>,
}

impl<F: StageFetcher> BuildProgressBar<F> {
    pub fn new(build_number: u32, fetcher: F) -> Self {
        Self {
            fetcher,
            build_number,
            reference_stages: None,
            rendered: Vec::new(),
        }
    }

    fn ensure_reference(&mut self) -> Result<(), ProgressError> {
        if self.reference_stages.is_none() {
            let stages = self
                .fetcher
                .stages(self.build_number - 1)
                .map_err(|e| ProgressError(e.into()))?;
            self.reference_stages = Some(stages);
        }
        Ok(())
    }

    /// The very first build has no reference run: every stage estimates
    /// against the default duration.
    fn first_build_bars(&mut self) -> Result<Vec<String>, ProgressError> {
        let current = self
            .fetcher
            .stages(self.build_number)
            .map_err(|e| ProgressError(e.into()))?;
        Ok(current
            .iter()
            .map(|stage| stage_bar(stage, DEFAULT_STAGE_DURATION_MILLIS))
            .collect())
    }

    /// Walk the current stages against the reference run. A stage-name
    /// mismatch (or the current run growing past the reference) means
    /// the pipeline changed: truncate the bar list there and estimate
    /// every later stage against the default duration.
    fn estimated_bars(&mut self) -> Result<Vec<String>, ProgressError> {
        self.ensure_reference()?;
        let current = self
            .fetcher
            .stages(self.build_number)
            .map_err(|e| ProgressError(e.into()))?;
        let reference = self.reference_stages.as_deref().unwrap_or_default();

        let mut bars: Vec<String> = reference
            .iter()
            .map(|stage| percentage_bar(0, &stage.name, Tone::Pending))
            .collect();
        let mut reset = false;
        for (i, stage) in current.iter().enumerate() {
            if i >= reference.len() {
                reset = true;
            }
            if !reset && reference[i].name != stage.name {
                bars.truncate(i + 1);
                reset = true;
            }
            let expected = if reset {
                DEFAULT_STAGE_DURATION_MILLIS
            } else {
                reference[i].duration_millis
            };
            let bar = stage_bar(stage, expected);
            if i < bars.len() {
                bars[i] = bar;
            } else {
                bars.push(bar);
            }
        }
        Ok(bars)
    }

    fn refresh(&mut self) -> Result<Vec<String>, ProgressError> {
        let bars = if self.build_number <= 1 {
            self.first_build_bars()?
        } else {
            self.estimated_bars()?
        };
        self.rendered = bars.clone();
        Ok(bars)
    }

    /// One last refresh so terminal states show final percentages; if
    /// the fetch fails now, the last rendered bars stand.
    fn final_snapshot(&mut self) -> Vec<String> {
        match self.refresh() {
            Ok(bars) => bars,
            Err(_) => self.rendered.clone(),
        }
    }
}

impl<F: StageFetcher> ProgressBar for BuildProgressBar<F> {
    fn running(&mut self) -> Result<Vec<String>, ProgressError> {
        self.refresh()
    }

    fn completed(&mut self) -> Vec<String> {
        self.final_snapshot()
    }

    fn failed(&mut self) -> Vec<String> {
        self.final_snapshot()
    }

    fn refresh_interval(&self) -> Duration {
        REFRESH_INTERVAL
    }
}

fn stage_bar(stage: &Stage, expected_duration_millis: i64) -> String {
    match stage.status {
        Status::Success => percentage_bar(100, &stage.name, Tone::Done),
        // Ran but did not succeed: pin just below full so it cannot be
        // mistaken for a completed stage.
        status if status.is_terminal_failure() => percentage_bar(99, &stage.name, Tone::Failed),
        _ => {
            let elapsed = (now_millis() - stage.start_time_millis).max(0);
            let percentage = elapsed
                .saturating_mul(100)
                .checked_div(expected_duration_millis.max(1))
                .unwrap_or(0)
                .clamp(0, 99);
            percentage_bar(percentage as u8, &stage.name, Tone::Running)
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Tone {
    Running,
    Done,
    Failed,
    Pending,
}

const BAR_SIZE: usize = 10;

/// `[████░░░░░░]  42% Build` — ten segments, clamped to [0, 100].
pub(crate) fn percentage_bar(percentage: u8, label: &str, tone: Tone) -> String {
    let percentage = percentage.min(100);
    let done = percentage as usize / (100 / BAR_SIZE);
    let done_style = match tone {
        Tone::Done => Style::new().green(),
        Tone::Failed => Style::new().red(),
        Tone::Running | Tone::Pending => Style::new().yellow(),
    };
    format!(
        "[{}{}] {:>3}% {}",
        done_style.apply_to("█".repeat(done)),
        Style::new().cyan().apply_to("░".repeat(BAR_SIZE - done)),
        percentage,
        label
    )
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
