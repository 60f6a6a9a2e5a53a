//! Clipboard Collector
//!
//! Access port to the monitored resource. The watcher and detectors only
//! READ through this port; the action state machine is the only writer
//! (wipe on block, replacement on sanitize).
//!
//! Backends:
//! - `SystemClipboard` - real OS clipboard via arboard (feature
//!   `system-clipboard`)
//! - `MemoryClipboard` - in-process buffer; the stub backend for headless
//!   builds, and the substitute used by tests

#![allow(dead_code)]

use parking_lot::Mutex;

use crate::error::CapabilityError;

// ============================================================================
// IMAGE TYPES
// ============================================================================

/// Pixel layout of a clipboard image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgba,
    Rgb,
    Grayscale,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Rgba => "RGBA",
            ColorMode::Rgb => "RGB",
            ColorMode::Grayscale => "L",
        }
    }
}

/// Raw image grabbed from the clipboard
#[derive(Debug, Clone)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub color_mode: ColorMode,
    pub bytes: Vec<u8>,
}

/// Lightweight dedup signature: dimensions + color mode. Comparing full
/// pixel data every tick would defeat the point of a cheap poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSignature {
    pub width: usize,
    pub height: usize,
    pub color_mode: ColorMode,
}

impl ImageSignature {
    pub fn of(image: &ClipboardImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            color_mode: image.color_mode,
        }
    }
}

// ============================================================================
// PORT
// ============================================================================

/// Abstract clipboard backend interface
pub trait ClipboardPort {
    fn read_text(&self) -> Result<String, CapabilityError>;
    fn write_text(&self, text: &str) -> Result<(), CapabilityError>;
    /// None when the clipboard holds no image
    fn read_image(&self) -> Result<Option<ClipboardImage>, CapabilityError>;
    /// Remove whatever the clipboard currently holds
    fn clear(&self) -> Result<(), CapabilityError>;
}

// ============================================================================
// MEMORY BACKEND
// ============================================================================

#[derive(Default)]
struct MemoryState {
    text: String,
    image: Option<ClipboardImage>,
}

/// In-process clipboard buffer
#[derive(Default)]
pub struct MemoryClipboard {
    state: Mutex<MemoryState>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a user paste (tests and demos)
    pub fn put_text(&self, text: &str) {
        self.state.lock().text = text.to_string();
    }

    /// Simulate an image landing on the clipboard
    pub fn put_image(&self, image: ClipboardImage) {
        self.state.lock().image = Some(image);
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read_text(&self) -> Result<String, CapabilityError> {
        Ok(self.state.lock().text.clone())
    }

    fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.state.lock().text = text.to_string();
        Ok(())
    }

    fn read_image(&self) -> Result<Option<ClipboardImage>, CapabilityError> {
        Ok(self.state.lock().image.clone())
    }

    fn clear(&self) -> Result<(), CapabilityError> {
        let mut state = self.state.lock();
        state.text.clear();
        state.image = None;
        Ok(())
    }
}

// ============================================================================
// SYSTEM BACKEND (arboard)
// ============================================================================

#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, CapabilityError> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| CapabilityError::Resource(format!("clipboard init: {}", e)))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardPort for SystemClipboard {
    fn read_text(&self) -> Result<String, CapabilityError> {
        // "No text on clipboard" is not an error for the poll loop; report
        // empty and let the watcher skip the tick.
        match self.inner.lock().get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(CapabilityError::Resource(format!("clipboard read: {}", e))),
        }
    }

    fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.inner
            .lock()
            .set_text(text.to_string())
            .map_err(|e| CapabilityError::Resource(format!("clipboard write: {}", e)))
    }

    fn read_image(&self) -> Result<Option<ClipboardImage>, CapabilityError> {
        match self.inner.lock().get_image() {
            Ok(image) => Ok(Some(ClipboardImage {
                width: image.width,
                height: image.height,
                // arboard always hands back RGBA
                color_mode: ColorMode::Rgba,
                bytes: image.bytes.into_owned(),
            })),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(CapabilityError::Resource(format!("image grab: {}", e))),
        }
    }

    fn clear(&self) -> Result<(), CapabilityError> {
        self.inner
            .lock()
            .clear()
            .map_err(|e| CapabilityError::Resource(format!("clipboard clear: {}", e)))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize, mode: ColorMode) -> ClipboardImage {
        ClipboardImage {
            width,
            height,
            color_mode: mode,
            bytes: vec![0; width * height * 4],
        }
    }

    #[test]
    fn test_memory_roundtrip_and_clear() {
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("hello");
        assert_eq!(clipboard.read_text().unwrap(), "hello");

        clipboard.put_image(image(4, 4, ColorMode::Rgba));
        assert!(clipboard.read_image().unwrap().is_some());

        clipboard.clear().unwrap();
        assert_eq!(clipboard.read_text().unwrap(), "");
        assert!(clipboard.read_image().unwrap().is_none());
    }

    #[test]
    fn test_signature_ignores_pixel_data() {
        let a = image(8, 8, ColorMode::Rgba);
        let mut b = image(8, 8, ColorMode::Rgba);
        b.bytes[0] = 255;
        assert_eq!(ImageSignature::of(&a), ImageSignature::of(&b));
    }

    #[test]
    fn test_signature_changes_with_dimensions_and_mode() {
        let base = ImageSignature::of(&image(8, 8, ColorMode::Rgba));
        assert_ne!(base, ImageSignature::of(&image(9, 8, ColorMode::Rgba)));
        assert_ne!(base, ImageSignature::of(&image(8, 9, ColorMode::Rgba)));
        assert_ne!(base, ImageSignature::of(&image(8, 8, ColorMode::Rgb)));
    }
}
