use std::time::Duration;

/// Configuration for the chat-completion client
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmConfig {
    /// Model identifier sent with every request
    ///
    /// Default: `gpt-3.5-turbo-0125`
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    ///
    /// Default: `https://api.openai.com/v1`
    pub base_url: String,

    /// Timeout for individual requests
    ///
    /// Default: 30 seconds
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-0125".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL of the endpoint.
    ///
    /// A trailing slash is stripped so path joining stays uniform.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout for individual requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo-0125");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_methods() {
        let config = LlmConfig::default()
            .with_model("gpt-4o-mini")
            .with_base_url("http://localhost:11434/v1/")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
