/// Model ID constants
pub mod models {
    // Google/Gemini models
    pub mod google {
        pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
        pub const SUPPORTED_MODELS: &[&str] = &[
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
            "gemini-2.5-flash",
            "gemini-2.5-pro",
        ];
    }

    pub mod mock {
        pub const DEFAULT_MODEL: &str = "mock-echo";
    }
}

/// Provider identifiers accepted in `[agent].provider`
pub mod providers {
    pub const GEMINI: &str = "gemini";
    /// Offline provider that echoes the last user message
    pub const MOCK: &str = "mock";
}

/// API endpoints
pub mod urls {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// Default configuration values
pub mod defaults {
    use super::{models, providers};

    pub const DEFAULT_PROVIDER: &str = providers::GEMINI;
    pub const DEFAULT_MODEL: &str = models::google::DEFAULT_MODEL;
    pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    pub const DEFAULT_COMPACTION_THRESHOLD: usize = 8;
    pub const DEFAULT_PRESERVE_HEAD: usize = 5;

    pub const DEFAULT_SESSION_ID: &str = "default";
}

/// File-system locations
pub mod paths {
    pub const CONFIG_FILE_NAME: &str = "memchat.toml";
    pub const DOT_DIR: &str = ".memchat";
    pub const SESSIONS_DIR: &str = "sessions";
}

/// Environment variable names
pub mod env_vars {
    /// Overrides the checkpoint directory used by the file store
    pub const SESSION_DIR: &str = "MEMCHAT_SESSION_DIR";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    /// Bare name used by older scripts' `.env` files
    pub const GEMINI_SHORT: &str = "GEMINI";
}

/// Prompt fragments
pub mod prompts {
    pub const SUMMARY_INSTRUCTION: &str = "Summarize the following conversation messages. \
Keep only the important facts, decisions, or context needed for continuation. \
Make it concise but complete:\n\n";
    pub const SUMMARY_PREFIX: &str = "[Summary of earlier conversation]: ";
}

/// Interactive chat loop
pub mod chat {
    pub const INPUT_PROMPT: &str = "Enter your query: ";
    pub const EXIT_COMMANDS: &[&str] = &["exit", "1"];
    pub const EXIT_MESSAGE: &str = "Exiting chat.";
    pub const REPLY_PREFIX: &str = "AI:";
}
