//! API key retrieval from the environment and `.env` files.
//!
//! Lookup order for a provider: the configured variable name
//! (`[agent].api_key_env`), the provider's default variable, then the
//! provider's legacy fallbacks. The first non-empty value wins.

use crate::config::constants::{defaults, env_vars, providers};
use anyhow::{Result, bail};
use std::env;
use tracing::{debug, warn};

/// Load environment variables from a `.env` file in the current directory.
///
/// A missing file is fine. A malformed one is logged and ignored.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment variables");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!(error = %e, "failed to load .env file");
            Ok(())
        }
    }
}

/// Whether `provider` talks to a hosted API and therefore needs a key.
pub fn requires_api_key(provider: &str) -> bool {
    !provider.trim().eq_ignore_ascii_case(providers::MOCK)
}

/// Variable names to try for `provider`, in order, without duplicates.
pub fn api_key_candidates(provider: &str, configured_env: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        let name = name.trim();
        if !name.is_empty() && !candidates.iter().any(|existing| existing == name) {
            candidates.push(name.to_string());
        }
    };

    push(configured_env);
    if provider.trim().eq_ignore_ascii_case(providers::GEMINI) {
        push(defaults::DEFAULT_API_KEY_ENV);
        push(env_vars::GOOGLE_API_KEY);
        push(env_vars::GEMINI_SHORT);
    }
    candidates
}

/// Get the API key for `provider`, trying [`api_key_candidates`] in order.
pub fn get_api_key(provider: &str, configured_env: &str) -> Result<String> {
    let candidates = api_key_candidates(provider, configured_env);
    for name in &candidates {
        if let Ok(key) = env::var(name) {
            if !key.trim().is_empty() {
                debug!(provider, variable = %name, "resolved API key");
                return Ok(key);
            }
        }
    }

    bail!(
        "No API key found for {} provider. Set one of {} (or add it to a .env file)",
        provider,
        candidates.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvGuard {
        key: &'static str,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            unsafe {
                env::set_var(key, value);
            }
            Self { key }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            unsafe {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn gemini_candidates_include_fallbacks_once() {
        assert_eq!(
            api_key_candidates("gemini", "GEMINI_API_KEY"),
            vec!["GEMINI_API_KEY", "GOOGLE_API_KEY", "GEMINI"]
        );
        assert_eq!(
            api_key_candidates("Gemini", "MY_KEY"),
            vec!["MY_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY", "GEMINI"]
        );
    }

    #[test]
    fn configured_variable_is_read() {
        let _guard = EnvGuard::set("MEMCHAT_TEST_CONFIGURED_KEY", "secret-value");
        let key = get_api_key("gemini", "MEMCHAT_TEST_CONFIGURED_KEY").unwrap();
        assert_eq!(key, "secret-value");
    }

    #[test]
    fn missing_key_lists_every_candidate() {
        let err = get_api_key("openai", "MEMCHAT_TEST_ABSENT_KEY").unwrap_err();
        assert!(err.to_string().contains("MEMCHAT_TEST_ABSENT_KEY"));
    }

    #[test]
    fn mock_needs_no_key() {
        assert!(!requires_api_key("mock"));
        assert!(requires_api_key("gemini"));
    }
}
