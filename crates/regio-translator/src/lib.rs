mod client;
mod deepl;

pub use client::TranslationClient;
pub use deepl::DeepLTranslator;

pub type LanguageCode = String;

/// Machine translation backend
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// `source` may be empty to let the provider detect it
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError>;

    /// One-time preparation such as model download or credential check
    async fn ensure_ready(&self) -> Result<(), TranslateError> {
        Ok(())
    }

    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    /// Source language reported back by the provider, if any
    pub detected_source: Option<LanguageCode>,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Character quota exhausted")]
    QuotaExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
