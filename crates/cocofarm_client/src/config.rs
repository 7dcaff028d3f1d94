use crate::FarmError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_token: SecretString,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FarmError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FarmError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("COCOFARM_API_TOKEN")
            .ok_or_else(|| FarmError::Config("COCOFARM_API_TOKEN missing".into()))?;
        let base_url =
            get("COCOFARM_BASE_URL").unwrap_or_else(|| "https://api.cocofarm.io".into());
        Ok(Self {
            api_token: SecretString::new(token.into()),
            base_url,
        })
    }
}
