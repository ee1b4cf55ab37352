//! Export stages and the pure state machine that tracks them.

use std::fmt;

use serde::Serialize;

/// One named phase of an export run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResolvingEmbeds,
    ConvertingToHtml,
    GeneratingPdf,
    SendingToKindle,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::ResolvingEmbeds,
        Stage::ConvertingToHtml,
        Stage::GeneratingPdf,
        Stage::SendingToKindle,
    ];

    /// Zero-based position in [`Stage::ALL`].
    pub fn index(self) -> usize {
        match self {
            Stage::ResolvingEmbeds => 0,
            Stage::ConvertingToHtml => 1,
            Stage::GeneratingPdf => 2,
            Stage::SendingToKindle => 3,
        }
    }

    /// Human-readable label for progress output.
    pub fn label(self) -> &'static str {
        match self {
            Stage::ResolvingEmbeds => "Resolving embeds",
            Stage::ConvertingToHtml => "Converting to HTML",
            Stage::GeneratingPdf => "Generating PDF",
            Stage::SendingToKindle => "Sending to Kindle",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a single stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    Active,
    Done,
    Failed,
}

/// Input to [`PipelineState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// Finish the active stage (if any) and start the next pending one.
    Advance,
    /// The active stage raised an error.
    Fail,
    /// The last stage completed.
    Finish,
}

/// Status of all four stages.
///
/// Transitions are pure: [`apply`](Self::apply) returns a new state and
/// never mutates in place, so the machine can be tested without any display.
///
/// Invariants held by every reachable state:
/// - at most one stage is `Active` or `Failed`
/// - every stage before it is `Done`
/// - every stage after it is `Pending`
///
/// # Examples
///
/// ```
/// use vellum::domain::{PipelineState, Stage, StageEvent, StageStatus};
///
/// let state = PipelineState::new()
///     .apply(StageEvent::Advance)
///     .apply(StageEvent::Advance);
/// assert_eq!(state.active(), Some(Stage::ConvertingToHtml));
/// assert_eq!(state.status(Stage::ResolvingEmbeds), StageStatus::Done);
///
/// let failed = state.apply(StageEvent::Fail);
/// assert_eq!(failed.failed(), Some(Stage::ConvertingToHtml));
/// assert_eq!(failed.status(Stage::GeneratingPdf), StageStatus::Pending);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineState {
    statuses: [StageStatus; 4],
}

impl PipelineState {
    /// All stages pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next state for `event`.
    ///
    /// Events that don't apply to the current state return it unchanged;
    /// a failed pipeline never moves again.
    pub fn apply(self, event: StageEvent) -> Self {
        if self.failed().is_some() {
            return self;
        }
        let mut next = self;
        match event {
            StageEvent::Advance => {
                let Some(pending) = self.first_with(StageStatus::Pending) else {
                    return self;
                };
                if let Some(active) = self.active() {
                    next.statuses[active.index()] = StageStatus::Done;
                }
                next.statuses[pending.index()] = StageStatus::Active;
            }
            StageEvent::Fail => {
                let Some(active) = self.active() else {
                    return self;
                };
                next.statuses[active.index()] = StageStatus::Failed;
            }
            StageEvent::Finish => {
                let last = Stage::ALL[Stage::ALL.len() - 1];
                if self.active() != Some(last) {
                    return self;
                }
                next.statuses[last.index()] = StageStatus::Done;
            }
        }
        next
    }

    /// Status of one stage.
    pub fn status(&self, stage: Stage) -> StageStatus {
        self.statuses[stage.index()]
    }

    /// The stage currently running, if any.
    pub fn active(&self) -> Option<Stage> {
        self.first_with(StageStatus::Active)
    }

    /// The stage that failed, if any.
    pub fn failed(&self) -> Option<Stage> {
        self.first_with(StageStatus::Failed)
    }

    /// True once every stage is done.
    pub fn is_complete(&self) -> bool {
        self.statuses.iter().all(|s| *s == StageStatus::Done)
    }

    /// Stages paired with their status, in order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, StageStatus)> + '_ {
        Stage::ALL.iter().map(|stage| (*stage, self.status(*stage)))
    }

    fn first_with(&self, status: StageStatus) -> Option<Stage> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| self.status(*stage) == status)
    }
}
