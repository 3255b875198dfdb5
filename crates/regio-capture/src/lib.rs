mod capturer;
mod recognize;
mod source;
mod tesseract;

#[cfg(feature = "desktop")]
mod hotkey;
#[cfg(feature = "desktop")]
mod screen;
#[cfg(windows)]
mod windows_ocr;

pub use capturer::{FrameCapturer, strip_padding};
pub use recognize::{RecognitionClient, Recognizer};
pub use source::{
    BYTES_PER_PIXEL, CaptureHandle, CaptureSource, ImageFileSource, PixelFormat, RawBuffer,
    SourceStats, SyntheticSource,
};
pub use tesseract::TesseractRecognizer;

#[cfg(feature = "desktop")]
pub use hotkey::{HotkeyAction, HotkeyManager};
#[cfg(feature = "desktop")]
pub use screen::ScreenSource;
#[cfg(windows)]
pub use windows_ocr::{ComScope, WindowsOcrRecognizer};
