//! The persisted cursor of the vote-processing state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage a processing run is in.
///
/// A run walks the stages in declaration order, skipping stages whose
/// registry is empty, and returns to [`Self::Idle`] when the election
/// has been recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessStage {
    /// No run in progress; the next processing call starts one.
    #[default]
    Idle,
    /// Fetching one valid validator's target-chain address per call.
    Validators,
    /// Collecting one guardian's stake per call.
    Guardians,
    /// Collecting one delegator's stake per call.
    Delegators,
    /// Tally, selection, and recording of the result.
    Calculations,
}

impl ProcessStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validators => "validators",
            Self::Guardians => "guardians",
            Self::Delegators => "delegators",
            Self::Calculations => "calculations",
        }
    }
}

impl fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage plus the index of the next registry item to process within it.
///
/// Persisted after every processing call so a run can resume across engine
/// restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessState {
    pub stage: ProcessStage,
    pub item: u32,
}

impl ProcessState {
    pub fn at(stage: ProcessStage, item: u32) -> Self {
        Self { stage, item }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.stage, self.item)
    }
}
