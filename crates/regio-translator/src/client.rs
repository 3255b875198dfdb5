use std::sync::Arc;

use crate::{LanguageCode, Translator};

/// Translation as seen by the poll loop: blank input or any failure yields
/// an empty string, errors never reach the caller.
#[derive(Clone)]
pub struct TranslationClient {
    provider: Option<Arc<dyn Translator>>,
    source: LanguageCode,
    target: LanguageCode,
}

impl TranslationClient {
    pub fn new(provider: Arc<dyn Translator>, source: LanguageCode, target: LanguageCode) -> Self {
        Self {
            provider: Some(provider),
            source,
            target,
        }
    }

    /// Client that translates nothing, every call returns an empty string
    pub fn disabled() -> Self {
        Self {
            provider: None,
            source: String::new(),
            target: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn ensure_ready(&self) {
        let Some(provider) = &self.provider else {
            return;
        };
        match provider.ensure_ready().await {
            Ok(()) => tracing::info!("{} translator ready", provider.metadata().name),
            Err(e) => tracing::warn!("{} translator not ready: {}", provider.metadata().name, e),
        }
    }

    pub async fn translate(&self, text: &str) -> String {
        let Some(provider) = &self.provider else {
            return String::new();
        };
        if text.trim().is_empty() {
            return String::new();
        }

        match provider.translate(text, &self.source, &self.target).await {
            Ok(translation) => {
                if let Some(detected) = &translation.detected_source
                    && !self.source.is_empty()
                    && !detected.eq_ignore_ascii_case(&self.source)
                {
                    tracing::debug!(
                        "{} detected {} instead of {}",
                        translation.provider,
                        detected,
                        self.source
                    );
                }
                translation.text
            }
            Err(e) => {
                tracing::warn!("Translation failed: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{ProviderMetadata, TranslateError, Translation};

    #[derive(Default)]
    struct Upper {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Translator for Upper {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<Translation, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TranslateError::RateLimitExceeded);
            }
            Ok(Translation {
                text: text.to_uppercase(),
                detected_source: None,
                provider: "upper".into(),
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "upper".into(),
                requires_api_key: false,
            }
        }
    }

    #[tokio::test]
    async fn blank_input_skips_provider() {
        let provider = Arc::new(Upper::default());
        let client = TranslationClient::new(provider.clone(), "en".into(), "ko".into());
        assert_eq!(client.translate("  \n").await, "");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.translate("hello").await, "HELLO");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_errors_become_empty() {
        let provider = Arc::new(Upper {
            fail: true,
            ..Default::default()
        });
        let client = TranslationClient::new(provider, "en".into(), "ko".into());
        assert_eq!(client.translate("hello").await, "");
    }

    #[tokio::test]
    async fn disabled_client_returns_empty() {
        let client = TranslationClient::disabled();
        assert!(!client.is_enabled());
        client.ensure_ready().await;
        assert_eq!(client.translate("hello").await, "");
    }
}
