//! Conversation transcript data model
//!
//! A [`Transcript`] is the ordered list of [`Turn`]s that belongs to one chat
//! session. Sequence indices are assigned when a turn is appended and must stay
//! strictly increasing and contiguous. Every path that builds a transcript from
//! raw turns, checkpoint loads included, goes through [`Transcript::from_turns`]
//! so a malformed transcript never reaches the compactor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who produced a turn. The compaction policy never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnRole {
    User,
    Assistant,
    /// Synthetic turn produced by summarizing part of the transcript
    SystemSummary,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::SystemSummary => "system-summary",
        }
    }

    /// Upper-case label used when a turn is rendered into a summarization prompt
    pub fn prompt_label(&self) -> &'static str {
        match self {
            TurnRole::User => "USER",
            TurnRole::Assistant => "ASSISTANT",
            TurnRole::SystemSummary => "SUMMARY",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    text: String,
    sequence: u64,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>, sequence: u64) -> Self {
        Self {
            role,
            text: text.into(),
            sequence,
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Compare role and text, ignoring the sequence index
    pub fn same_content(&self, other: &Turn) -> bool {
        self.role == other.role && self.text == other.text
    }

    fn with_sequence(self, sequence: u64) -> Self {
        Self { sequence, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error(
        "invalid transcript: turn at position {position} has sequence {found}, expected {expected}"
    )]
    InvalidTranscript {
        position: usize,
        expected: u64,
        found: u64,
    },
    #[error("invalid transcript: sequence indices overflow at position {position}")]
    SequenceOverflow { position: usize },
    #[error("invalid session identifier: must not be empty")]
    EmptySessionId,
}

/// Ordered turns of a single session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transcript from existing turns, checking that their sequence
    /// indices are contiguous in order. The first index may be any value, but
    /// the last one must leave room for the next append.
    pub fn from_turns(turns: Vec<Turn>) -> Result<Self, TranscriptError> {
        if let Some(first) = turns.first() {
            let base = first.sequence;
            for (position, turn) in turns.iter().enumerate() {
                let expected = base
                    .checked_add(position as u64)
                    .ok_or(TranscriptError::SequenceOverflow { position })?;
                if turn.sequence != expected {
                    return Err(TranscriptError::InvalidTranscript {
                        position,
                        expected,
                        found: turn.sequence,
                    });
                }
            }
            if let Some(last) = turns.last() {
                if last.sequence == u64::MAX {
                    return Err(TranscriptError::SequenceOverflow {
                        position: turns.len() - 1,
                    });
                }
            }
        }
        Ok(Self { turns })
    }

    /// Build a transcript from turns in the given order, assigning fresh
    /// indices starting at zero.
    pub fn resequenced(turns: impl IntoIterator<Item = Turn>) -> Self {
        let turns = turns
            .into_iter()
            .enumerate()
            .map(|(index, turn)| turn.with_sequence(index as u64))
            .collect();
        Self { turns }
    }

    /// Append a turn, assigning the next sequence index.
    pub fn push(&mut self, role: TurnRole, text: impl Into<String>) -> &Turn {
        let sequence = self.next_sequence();
        self.turns.push(Turn::new(role, text, sequence));
        &self.turns[self.turns.len() - 1]
    }

    /// Every transcript leaves room below `u64::MAX`, so this never saturates
    /// in practice.
    pub fn next_sequence(&self) -> u64 {
        self.turns
            .last()
            .map_or(0, |turn| turn.sequence.saturating_add(1))
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

impl TryFrom<Vec<Turn>> for Transcript {
    type Error = TranscriptError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        Self::from_turns(turns)
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Opaque key that ties a transcript to its persisted checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Result<Self, TranscriptError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TranscriptError::EmptySessionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = TranscriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl FromStr for SessionId {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
