use crate::{env_parse, ConfigError, FromEnv};

const DEFAULT_MAX_LATENCY_MS: u64 = 200;

/// Fault-injection switches used to exercise clients against a misbehaving catalog.
///
/// Both switches are off unless explicitly enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureFlags {
    pub simulate_latency: bool,
    /// Upper bound of the random extra delay, in milliseconds
    pub max_latency_ms: u64,
    pub simulate_errors: bool,
    /// Probability in `0.0..=1.0` that a simulated failure fires
    pub error_rate: f64,
}

impl FeatureFlags {
    /// Flags with every fault switched off.
    pub fn disabled() -> Self {
        Self {
            simulate_latency: false,
            max_latency_ms: DEFAULT_MAX_LATENCY_MS,
            simulate_errors: false,
            error_rate: 0.0,
        }
    }

    pub fn with_latency(mut self, max_latency_ms: u64) -> Self {
        self.simulate_latency = true;
        self.max_latency_ms = max_latency_ms;
        self
    }

    pub fn with_errors(mut self, error_rate: f64) -> Self {
        self.simulate_errors = true;
        self.error_rate = error_rate.clamp(0.0, 1.0);
        self
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::disabled()
    }
}

impl FromEnv for FeatureFlags {
    /// Reads:
    /// - SIMULATE_LATENCY: "true" enables delays (default false)
    /// - MAX_LATENCY_MS: defaults to 200
    /// - SIMULATE_ERRORS: "true" enables random failures (default false)
    /// - ERROR_RATE: probability between 0.0 and 1.0 (default 0.0)
    fn from_env() -> Result<Self, ConfigError> {
        let simulate_latency = env_parse("SIMULATE_LATENCY", false)?;
        let max_latency_ms = env_parse("MAX_LATENCY_MS", DEFAULT_MAX_LATENCY_MS)?;
        let simulate_errors = env_parse("SIMULATE_ERRORS", false)?;
        let error_rate: f64 = env_parse("ERROR_RATE", 0.0)?;

        if !(0.0..=1.0).contains(&error_rate) {
            return Err(ConfigError::ParseError {
                key: "ERROR_RATE".to_string(),
                details: format!("{error_rate} is outside 0.0..=1.0"),
            });
        }

        Ok(Self {
            simulate_latency,
            max_latency_ms,
            simulate_errors,
            error_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 4] = [
        "SIMULATE_LATENCY",
        "MAX_LATENCY_MS",
        "SIMULATE_ERRORS",
        "ERROR_RATE",
    ];

    #[test]
    fn test_feature_flags_default_to_disabled() {
        temp_env::with_vars(KEYS.map(|k| (k, None::<&str>)), || {
            let flags = FeatureFlags::from_env().unwrap();
            assert_eq!(flags, FeatureFlags::disabled());
            assert_eq!(flags.max_latency_ms, 200);
        });
    }

    #[test]
    fn test_feature_flags_from_env() {
        temp_env::with_vars(
            [
                ("SIMULATE_LATENCY", Some("true")),
                ("MAX_LATENCY_MS", Some("50")),
                ("SIMULATE_ERRORS", Some("true")),
                ("ERROR_RATE", Some("0.25")),
            ],
            || {
                let flags = FeatureFlags::from_env().unwrap();
                assert!(flags.simulate_latency);
                assert_eq!(flags.max_latency_ms, 50);
                assert!(flags.simulate_errors);
                assert_eq!(flags.error_rate, 0.25);
            },
        );
    }

    #[test]
    fn test_feature_flags_reject_out_of_range_rate() {
        temp_env::with_vars(
            [
                ("SIMULATE_LATENCY", None),
                ("MAX_LATENCY_MS", None),
                ("SIMULATE_ERRORS", Some("true")),
                ("ERROR_RATE", Some("1.5")),
            ],
            || {
                let err = FeatureFlags::from_env().unwrap_err();
                assert!(err.to_string().contains("ERROR_RATE"));
            },
        );
    }

    #[test]
    fn test_feature_flags_reject_non_boolean() {
        temp_env::with_vars(
            [
                ("SIMULATE_LATENCY", Some("yes please")),
                ("MAX_LATENCY_MS", None),
                ("SIMULATE_ERRORS", None),
                ("ERROR_RATE", None),
            ],
            || {
                let err = FeatureFlags::from_env().unwrap_err();
                assert!(err.to_string().contains("SIMULATE_LATENCY"));
            },
        );
    }

    #[test]
    fn test_with_errors_clamps_rate() {
        let flags = FeatureFlags::disabled().with_errors(3.0);
        assert!(flags.simulate_errors);
        assert_eq!(flags.error_rate, 1.0);
    }
}
