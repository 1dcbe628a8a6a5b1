//! Resolution protocol - decision requests, option sets and validation
//!
//! The engine never talks to a terminal. It emits [`Event`]s to report what
//! happened and [`DecisionRequest`]s to ask what to do, through an
//! [`Operator`]. [`decide`] owns the constrained option sets: it re-asks until
//! the answer is one of the request's keys and turns `q` into
//! [`RekonError::Quit`].

mod scripted;

pub use scripted::{Record, ScriptedOperator};

use crate::types::{EntryKind, RekonError};
use serde::Serialize;
use std::time::SystemTime;
use tracing::{debug, info};

/// One operator answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    /// Copy all / copy this one / replace
    Yes,
    /// Skip all / skip this one
    No,
    /// Ask about each item in turn
    Select,
    Acknowledge,
    Quit,
}

impl Choice {
    /// Single-character key typed by the operator
    pub fn key(self) -> &'static str {
        match self {
            Choice::Yes => "y",
            Choice::No => "n",
            Choice::Select => "s",
            Choice::Acknowledge => "a",
            Choice::Quit => "q",
        }
    }

    /// Match `input` case-sensitively against the keys of `options`
    pub fn parse(input: &str, options: &[Choice]) -> Option<Choice> {
        options.iter().copied().find(|choice| choice.key() == input)
    }
}

const COPY_EXTRAS: &[Choice] = &[Choice::Yes, Choice::No, Choice::Select, Choice::Quit];
const YES_NO: &[Choice] = &[Choice::Yes, Choice::No, Choice::Quit];
const ACKNOWLEDGE: &[Choice] = &[Choice::Acknowledge, Choice::Quit];

/// A decision point, serializable so it can be logged or replayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum DecisionRequest {
    /// Source has entries the destination lacks: copy all, none, or select
    SourceExtras { names: Vec<String> },

    /// One item while selecting individually
    CopyItem { name: String },

    /// Destination has entries the source lacks; never deleted
    DestinationExtras { names: Vec<String> },

    /// Same name, different kinds
    KindMismatch {
        name: String,
        source: EntryKind,
        destination: EntryKind,
    },

    /// Paired working copies whose shapes differ
    RepositoryDivergence { name: String },

    /// Size and/or timestamp differ; replace the destination?
    ContentDivergence {
        name: String,
        entry_kind: EntryKind,
        size: Option<(u64, u64)>,
        time: Option<(SystemTime, SystemTime)>,
    },
}

impl DecisionRequest {
    /// Valid answers, quit included
    pub fn options(&self) -> &'static [Choice] {
        match self {
            DecisionRequest::SourceExtras { .. } => COPY_EXTRAS,
            DecisionRequest::CopyItem { .. } | DecisionRequest::ContentDivergence { .. } => YES_NO,
            DecisionRequest::DestinationExtras { .. }
            | DecisionRequest::KindMismatch { .. }
            | DecisionRequest::RepositoryDivergence { .. } => ACKNOWLEDGE,
        }
    }
}

/// Something the operator is told, not asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A new name is being compared (the roots display as `[root]`)
    Enter { name: String },

    /// A source extra was copied to the destination
    Copied { name: String },

    /// A destination entry was overwritten from the source
    Replaced { name: String },

    /// Paired working copies share the same shape and were not descended
    RepositoryInSync { name: String },

    /// Individual selection finished
    AllProcessed,
}

/// The interactive surface the engine drives
pub trait Operator {
    /// Render a report at nesting `depth`
    fn show(&mut self, depth: usize, event: &Event) -> Result<(), RekonError>;

    /// Present `request` with `options` and return one raw line of input
    fn ask(
        &mut self,
        depth: usize,
        request: &DecisionRequest,
        options: &[Choice],
    ) -> Result<String, RekonError>;
}

/// Ask until a valid key is given.
///
/// Invalid input is rejected and asked again. Quit is always available and
/// returns `RekonError::Quit` so the run ends at once.
pub fn decide<O: Operator + ?Sized>(
    operator: &mut O,
    depth: usize,
    request: &DecisionRequest,
) -> Result<Choice, RekonError> {
    let options = request.options();
    debug!(
        request = %serde_json::to_string(request).unwrap_or_default(),
        depth,
        "asking operator"
    );
    loop {
        let answer = operator.ask(depth, request, options)?;
        match Choice::parse(answer.trim_end_matches(['\r', '\n']), options) {
            Some(Choice::Quit) => {
                info!("operator quit");
                return Err(RekonError::Quit);
            }
            Some(choice) => {
                debug!(?choice, "decision");
                return Ok(choice);
            }
            None => debug!(answer = %answer.trim_end(), "rejected input"),
        }
    }
}
