use kanal::AsyncSender;
use regio_capture::{FrameCapturer, RecognitionClient};
use regio_core::{ImagePreprocessor, PipelineError, ProcessedImage, safe_crop};
use regio_translator::TranslationClient;
use regio_types::ScreenRect;
use tokio_util::sync::CancellationToken;

/// Results flowing back from pipeline workers to the poll loop
pub enum WorkerEvent {
    /// The capturer lent to a run, handed back once its frame was taken
    CapturerReturned(FrameCapturer),
    /// The blocking capture worker died and took the capturer with it
    CapturerLost,
    Recognized {
        run: u64,
        result: Result<String, PipelineError>,
    },
    Translated {
        run: u64,
        text: String,
    },
}

/// Bundles what a pipeline run needs so workers can be spawned with one value
#[derive(Clone)]
pub struct PipelineContext {
    pub recognition: RecognitionClient,
    pub translation: TranslationClient,
    pub preprocessor: ImagePreprocessor,
    pub worker_tx: AsyncSender<WorkerEvent>,
}

impl PipelineContext {
    pub fn new(
        recognition: RecognitionClient,
        translation: TranslationClient,
        worker_tx: AsyncSender<WorkerEvent>,
    ) -> Self {
        Self {
            recognition,
            translation,
            preprocessor: ImagePreprocessor::default(),
            worker_tx,
        }
    }
}

/// Capture, crop and preprocess on the calling (blocking) thread
pub fn capture_and_prepare(
    capturer: &mut FrameCapturer,
    rect: ScreenRect,
    preprocessor: &ImagePreprocessor,
) -> Result<ProcessedImage, PipelineError> {
    capturer.open()?;
    let frame = capturer.capture_frame()?;
    let cropped = safe_crop(&frame, rect);
    drop(frame);
    tracing::trace!("Cropped {}x{} at {:?}", cropped.width(), cropped.height(), rect);
    Ok(preprocessor.preprocess(&cropped))
}

/// First half of a run: frame work on the blocking pool, then recognition.
///
/// The capturer always goes back to the poll loop before the result does.
pub async fn recognize_run(
    ctx: PipelineContext,
    run: u64,
    mut capturer: FrameCapturer,
    rect: ScreenRect,
    token: CancellationToken,
) {
    let preprocessor = ctx.preprocessor;
    let joined = tokio::task::spawn_blocking(move || {
        let prepared = capture_and_prepare(&mut capturer, rect, &preprocessor);
        (capturer, prepared)
    })
    .await;

    let prepared = match joined {
        Ok((capturer, prepared)) => {
            let _ = ctx
                .worker_tx
                .send(WorkerEvent::CapturerReturned(capturer))
                .await;
            prepared
        }
        Err(e) => {
            tracing::error!("Capture worker failed: {}", e);
            let _ = ctx.worker_tx.send(WorkerEvent::CapturerLost).await;
            Err(PipelineError::CaptureUnavailable(
                regio_core::CaptureError::Source("capture worker failed".to_string()),
            ))
        }
    };

    let result = match prepared {
        // Stopped while capturing, the result would be thrown away anyway
        Ok(_) if token.is_cancelled() => Ok(String::new()),
        Ok(image) => Ok(ctx.recognition.recognize(&image).await),
        Err(e) => Err(e),
    };

    let _ = ctx
        .worker_tx
        .send(WorkerEvent::Recognized { run, result })
        .await;
}

/// Second half of a run, only reached when the recognized text changed
pub async fn translate_run(ctx: PipelineContext, run: u64, text: String, token: CancellationToken) {
    let text = if token.is_cancelled() {
        String::new()
    } else {
        ctx.translation.translate(&text).await
    };
    let _ = ctx
        .worker_tx
        .send(WorkerEvent::Translated { run, text })
        .await;
}
