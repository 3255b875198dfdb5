use regio_core::CaptureError;
use xcap::Monitor;

use crate::source::{CaptureHandle, CaptureSource, PixelFormat, RawBuffer};

/// Primary monitor through xcap
pub struct ScreenSource {
    monitor_id: Option<u32>,
    native: Option<(u32, u32)>,
}

impl ScreenSource {
    pub fn primary() -> Self {
        let monitor = primary_monitor().ok();
        Self {
            monitor_id: None,
            native: monitor.map(|m| (m.width(), m.height())),
        }
    }
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::Source(e.to_string()))?;
    let index = monitors.iter().position(|m| m.is_primary()).unwrap_or(0);
    monitors
        .into_iter()
        .nth(index)
        .ok_or_else(|| CaptureError::Source("No monitor found".to_string()))
}

/// xcap always returns the whole monitor, so any other size would misread every row
fn check_size(monitor: (u32, u32), requested: (u32, u32)) -> Result<(), CaptureError> {
    if monitor != requested {
        return Err(CaptureError::Source(format!(
            "monitor is {}x{}, capture size {}x{} does not match",
            monitor.0, monitor.1, requested.0, requested.1
        )));
    }
    Ok(())
}

// Monitors are looked up again on every pull so the source stays Send
fn monitor_by_id(id: u32) -> Result<Monitor, CaptureError> {
    Monitor::all()
        .map_err(|e| CaptureError::Source(e.to_string()))?
        .into_iter()
        .find(|m| m.id() == id)
        .ok_or_else(|| CaptureError::Source(format!("Monitor {id} disappeared")))
}

impl CaptureSource for ScreenSource {
    fn start(
        &mut self,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> Result<CaptureHandle, CaptureError> {
        let monitor = primary_monitor()?;
        check_size((monitor.width(), monitor.height()), (width, height))?;
        self.monitor_id = Some(monitor.id());
        Ok(CaptureHandle(monitor.id() as u64))
    }

    fn pull_latest_frame(
        &mut self,
        _handle: CaptureHandle,
    ) -> Result<Option<RawBuffer>, CaptureError> {
        let id = self.monitor_id.ok_or(CaptureError::NotStarted)?;
        let image = monitor_by_id(id)?
            .capture_image()
            .map_err(|e| CaptureError::Source(e.to_string()))?;
        Ok(Some(RawBuffer::packed(image)))
    }

    fn stop(&mut self, _handle: CaptureHandle) -> Result<(), CaptureError> {
        self.monitor_id.take().map(|_| ()).ok_or(CaptureError::NotStarted)
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        self.native
    }
}
