//! Operator fed from canned answers, recording everything it is shown

use super::{Choice, DecisionRequest, Event, Operator};
use crate::types::RekonError;
use std::collections::VecDeque;

/// One line of an operator transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Shown { depth: usize, event: Event },
    Asked { depth: usize, request: DecisionRequest },
}

/// Replays `answers` in order; running out is `RekonError::InputClosed`
#[derive(Debug, Default, Clone)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    transcript: Vec<Record>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[Record] {
        &self.transcript
    }

    /// Requests asked so far, re-asks included
    pub fn requests(&self) -> impl Iterator<Item = &DecisionRequest> {
        self.transcript.iter().filter_map(|record| match record {
            Record::Asked { request, .. } => Some(request),
            Record::Shown { .. } => None,
        })
    }

    /// Events shown so far
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.transcript.iter().filter_map(|record| match record {
            Record::Shown { event, .. } => Some(event),
            Record::Asked { .. } => None,
        })
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn show(&mut self, depth: usize, event: &Event) -> Result<(), RekonError> {
        self.transcript.push(Record::Shown {
            depth,
            event: event.clone(),
        });
        Ok(())
    }

    fn ask(
        &mut self,
        depth: usize,
        request: &DecisionRequest,
        _options: &[Choice],
    ) -> Result<String, RekonError> {
        self.transcript.push(Record::Asked {
            depth,
            request: request.clone(),
        });
        self.answers.pop_front().ok_or(RekonError::InputClosed)
    }
}
