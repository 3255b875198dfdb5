use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::{ProviderMetadata, TranslateError, Translation, Translator};

const PROVIDER: &str = "DeepL";

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize)]
struct TranslatedText {
    text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    character_count: u64,
    character_limit: u64,
}

/// DeepL REST API v2
#[derive(Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    fn usage_url(&self) -> String {
        match self.api_url.rsplit_once('/') {
            Some((base, _)) => format!("{base}/usage"),
            None => format!("{}/usage", self.api_url),
        }
    }

    fn check_status(status: StatusCode) -> Result<(), TranslateError> {
        match status.as_u16() {
            403 => Err(TranslateError::AuthenticationError),
            429 => Err(TranslateError::RateLimitExceeded),
            456 => Err(TranslateError::QuotaExceeded),
            _ if !status.is_success() => Err(TranslateError::ApiError(format!("HTTP {status}"))),
            _ => Ok(()),
        }
    }
}

/// Source languages are bare codes ("EN"), regional variants are dropped
fn source_code(code: &str) -> String {
    code.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

/// DeepL refuses the bare "EN" and "PT" targets
fn target_code(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "EN-US".to_string(),
        "pt" => "PT-PT".to_string(),
        other => other.replace('_', "-").to_uppercase(),
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let source = source_code(source);
        let target = target_code(target);
        let mut params = vec![("text", text), ("target_lang", target.as_str())];
        if !source.is_empty() {
            params.push(("source_lang", source.as_str()));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, self.auth_header())
            .form(&params)
            .send()
            .await?;
        Self::check_status(response.status())?;

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Unexpected response: {e}")))?;
        let first = body
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::ApiError("Empty translation list".to_string()))?;

        Ok(Translation {
            text: first.text,
            detected_source: first.detected_source_language,
            provider: PROVIDER.to_string(),
        })
    }

    /// Checks the key and the remaining character quota
    async fn ensure_ready(&self) -> Result<(), TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let response = self
            .client
            .get(self.usage_url())
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        Self::check_status(response.status())?;

        let usage: Usage = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Unexpected usage response: {e}")))?;
        tracing::info!(
            "DeepL usage: {}/{} characters",
            usage.character_count,
            usage.character_limit
        );
        if usage.character_limit > 0 && usage.character_count >= usage.character_limit {
            return Err(TranslateError::QuotaExceeded);
        }
        Ok(())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: PROVIDER.to_string(),
            requires_api_key: true,
        }
    }
}
