//! Bounded conversation-memory compaction
//!
//! Once a transcript grows past `threshold` turns it is rewritten as:
//!
//! ```text
//! [ head: first `preserve_head` turns ] [ one summary turn ] [ latest turn ]
//! ```
//!
//! The head and the latest turn are kept verbatim; everything between them is
//! condensed by a [`Summarizer`]. Summary turns get no special treatment on
//! later passes: an earlier summary can end up in the head or inside the next
//! middle window like any other turn, so summaries compound.
//!
//! The policy borrows its input and returns a new transcript. A failed
//! compaction therefore leaves the caller's transcript exactly as it was.

use crate::config::constants::defaults;
use crate::transcript::{Transcript, Turn, TurnRole};
use std::sync::Arc;
use tracing::debug;

pub use crate::summarizer::{SummarizationError, Summarizer};

#[derive(Debug, thiserror::Error)]
pub enum CompactionError {
    #[error("summarization unavailable: {0}")]
    SummarizationUnavailable(#[source] SummarizationError),
    #[error(
        "invalid compaction policy: preserve_head ({preserve_head}) must be less than threshold ({threshold})"
    )]
    InvalidPolicy {
        threshold: usize,
        preserve_head: usize,
    },
}

/// When to compact and how much of the beginning to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionPolicy {
    threshold: usize,
    preserve_head: usize,
}

impl CompactionPolicy {
    pub fn new(threshold: usize, preserve_head: usize) -> Result<Self, CompactionError> {
        if preserve_head >= threshold {
            return Err(CompactionError::InvalidPolicy {
                threshold,
                preserve_head,
            });
        }
        Ok(Self {
            threshold,
            preserve_head,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn preserve_head(&self) -> usize {
        self.preserve_head
    }

    /// Compaction triggers strictly above the threshold.
    pub fn should_compact(&self, len: usize) -> bool {
        len > self.threshold
    }

    /// Upper bound on the length of a compacted transcript.
    pub fn max_compacted_len(&self) -> usize {
        self.preserve_head + 2
    }
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            threshold: defaults::DEFAULT_COMPACTION_THRESHOLD,
            preserve_head: defaults::DEFAULT_PRESERVE_HEAD,
        }
    }
}

/// How a transcript would be split, without calling any summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionPlan<'a> {
    Unchanged,
    Split {
        head: &'a [Turn],
        middle: &'a [Turn],
        tail: &'a Turn,
    },
}

pub fn plan<'a>(transcript: &'a Transcript, policy: &CompactionPolicy) -> CompactionPlan<'a> {
    let turns = transcript.turns();
    if !policy.should_compact(turns.len()) {
        return CompactionPlan::Unchanged;
    }
    let Some((tail, rest)) = turns.split_last() else {
        return CompactionPlan::Unchanged;
    };
    let (head, middle) = rest.split_at(policy.preserve_head.min(rest.len()));
    CompactionPlan::Split { head, middle, tail }
}

/// Compact `transcript` according to `policy`.
///
/// Calls `summarizer` at most once. At or below the threshold the transcript
/// is returned as is.
pub async fn compact<S>(
    transcript: &Transcript,
    policy: &CompactionPolicy,
    summarizer: &S,
) -> Result<Transcript, CompactionError>
where
    S: Summarizer + ?Sized,
{
    let (head, middle, tail) = match plan(transcript, policy) {
        CompactionPlan::Unchanged => return Ok(transcript.clone()),
        CompactionPlan::Split { head, middle, tail } => (head, middle, tail),
    };

    let summary = if middle.is_empty() {
        None
    } else {
        let text = summarizer
            .summarize(middle)
            .await
            .map_err(CompactionError::SummarizationUnavailable)?;
        Some(Turn::new(TurnRole::SystemSummary, text, 0))
    };

    let compacted = Transcript::resequenced(
        head.iter()
            .cloned()
            .chain(summary)
            .chain(std::iter::once(tail.clone())),
    );

    debug!(
        before = transcript.len(),
        after = compacted.len(),
        summarized = middle.len(),
        "compacted transcript"
    );
    Ok(compacted)
}

/// A policy paired with the summarizer it should use.
#[derive(Clone)]
pub struct ConversationCompactor {
    policy: CompactionPolicy,
    summarizer: Arc<dyn Summarizer>,
}

impl ConversationCompactor {
    pub fn new(policy: CompactionPolicy, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { policy, summarizer }
    }

    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    pub async fn compact(&self, transcript: &Transcript) -> Result<Transcript, CompactionError> {
        compact(transcript, &self.policy, self.summarizer.as_ref()).await
    }
}
