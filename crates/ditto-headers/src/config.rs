//! Header limits loaded from environment variables.

/// Limits applied to headers before they are passed on.
///
/// Reads from environment variables:
/// - `DITTO_HEADERS_MAX_BYTES`: maximum summed key and value bytes (default: `5000`)
/// - `DITTO_HEADERS_MAX_AUTH_SUBJECTS`: maximum authorization subjects (default: `100`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadersConfig {
    pub max_bytes: usize,
    pub max_auth_subjects: usize,
}

impl HeadersConfig {
    pub const DEFAULT_MAX_BYTES: usize = 5000;
    pub const DEFAULT_MAX_AUTH_SUBJECTS: usize = 100;

    /// Loads limits from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            max_bytes: env_or("DITTO_HEADERS_MAX_BYTES", Self::DEFAULT_MAX_BYTES),
            max_auth_subjects: env_or(
                "DITTO_HEADERS_MAX_AUTH_SUBJECTS",
                Self::DEFAULT_MAX_AUTH_SUBJECTS,
            ),
        }
    }
}

fn env_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            max_auth_subjects: Self::DEFAULT_MAX_AUTH_SUBJECTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_values() {
        let config = HeadersConfig::default();
        assert_eq!(config.max_bytes, 5000);
        assert_eq!(config.max_auth_subjects, 100);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe {
            std::env::set_var("DITTO_HEADERS_MAX_BYTES", "1024");
            std::env::set_var("DITTO_HEADERS_MAX_AUTH_SUBJECTS", "not-a-number");
        }

        let config = HeadersConfig::from_env();

        unsafe {
            std::env::remove_var("DITTO_HEADERS_MAX_BYTES");
            std::env::remove_var("DITTO_HEADERS_MAX_AUTH_SUBJECTS");
        }

        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.max_auth_subjects, 100);
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_uses_defaults() {
        assert_eq!(HeadersConfig::from_env(), HeadersConfig::default());
    }
}
