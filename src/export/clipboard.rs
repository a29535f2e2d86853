use super::raster::RasterImage;
use crate::error::ExportError;

/// Destination for a single clipboard image payload.
pub trait ClipboardSink {
    fn write_image(&mut self, image: &RasterImage) -> Result<(), ExportError>;
}

/// Keeps the last written payload in memory. Useful for headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub last: Option<RasterImage>,
    pub writes: usize,
}

impl ClipboardSink for MemoryClipboard {
    fn write_image(&mut self, image: &RasterImage) -> Result<(), ExportError> {
        self.last = Some(image.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// Fails with [`ExportError::ClipboardUnavailable`] when the platform has
    /// no clipboard (headless sessions, missing display server).
    pub fn new() -> Result<Self, ExportError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|err| ExportError::ClipboardUnavailable(err.to_string()))
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn write_image(&mut self, image: &RasterImage) -> Result<(), ExportError> {
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: std::borrow::Cow::Owned(image.rgba()),
        };
        self.inner.set_image(data).map_err(|err| match err {
            arboard::Error::ClipboardNotSupported => {
                ExportError::ClipboardUnavailable(err.to_string())
            }
            other => ExportError::ClipboardWrite(other.to_string()),
        })
    }
}
