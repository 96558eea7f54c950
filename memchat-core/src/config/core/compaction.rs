use crate::compaction::{CompactionError, CompactionPolicy};
use crate::config::constants::defaults;
use serde::{Deserialize, Serialize};

/// Transcript compaction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompactionConfig {
    /// Compact once the transcript holds more than this many turns
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Leading turns kept verbatim; must be below `threshold`
    #[serde(default = "default_preserve_head")]
    pub preserve_head: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            preserve_head: default_preserve_head(),
        }
    }
}

impl CompactionConfig {
    pub fn policy(&self) -> Result<CompactionPolicy, CompactionError> {
        CompactionPolicy::new(self.threshold, self.preserve_head)
    }
}

fn default_threshold() -> usize {
    defaults::DEFAULT_COMPACTION_THRESHOLD
}
fn default_preserve_head() -> usize {
    defaults::DEFAULT_PRESERVE_HEAD
}
