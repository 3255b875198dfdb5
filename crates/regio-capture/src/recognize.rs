use std::sync::Arc;

use regio_core::ProcessedImage;

/// Text recognition engine
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, image: &ProcessedImage) -> anyhow::Result<String>;

    fn name(&self) -> &str;
}

/// Recognition as seen by the poll loop: failures become empty text
#[derive(Clone)]
pub struct RecognitionClient {
    engine: Arc<dyn Recognizer>,
}

impl RecognitionClient {
    pub fn new(engine: Arc<dyn Recognizer>) -> Self {
        Self { engine }
    }

    pub async fn recognize(&self, image: &ProcessedImage) -> String {
        match self.engine.recognize(image).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[{}] recognition failed: {:#}", self.engine.name(), e);
                String::new()
            }
        }
    }
}
