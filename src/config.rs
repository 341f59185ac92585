//! Configuration for the signing core.

use crate::crypto::MasterKey;
use crate::error::{Error, Result};

/// Environment variable holding the deployment environment name.
pub const ENV_ENVIRONMENT: &str = "SIGNET_ENVIRONMENT";
/// Environment variable holding the base64 master key.
pub const ENV_MASTER_KEY: &str = "SIGNET_MASTER_KEY";
/// Environment variable holding the PKCS#12 bundle password.
pub const ENV_BUNDLE_PASSWORD: &str = "SIGNET_BUNDLE_PASSWORD";
/// Environment variable holding the signature validation base URL.
pub const ENV_VALIDATE_URL: &str = "SIGNET_VALIDATE_URL";

/// Runtime configuration for the signing core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Logical deployment partition (e.g. "production", "staging").
    ///
    /// At most one active certificate exists per environment.
    pub environment: String,
    /// Master key protecting private keys at rest.
    pub master_key: MasterKey,
    /// Platform-wide password protecting exported PKCS#12 bundles.
    pub bundle_password: String,
    /// Base URL where signed documents can be validated.
    pub validate_url: String,
}

impl CoreConfig {
    /// Load configuration from the process environment.
    ///
    /// Any missing or malformed value is a fatal [`Error::Configuration`];
    /// the process must not serve signing requests without a master key.
    pub fn from_env() -> Result<Self> {
        let environment = require_var(ENV_ENVIRONMENT)?;
        let master_key = MasterKey::from_env(ENV_MASTER_KEY)?;
        let bundle_password = require_var(ENV_BUNDLE_PASSWORD)?;
        let validate_url = require_var(ENV_VALIDATE_URL)?;
        Ok(Self {
            environment,
            master_key,
            bundle_password,
            validate_url,
        })
    }
}

fn require_var(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!("{var} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_environment_is_fatal() {
        // Do not pollute the real process environment in tests; exercise the
        // helper directly with a name that cannot exist.
        let err = require_var("SIGNET_TEST_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
