//! Screenshot acquisition
//!
//! The desktop is grabbed once at startup, before the viewer window is
//! mapped, and handed to the renderer as tightly packed RGBA8 rows
//! (row 0 = top of the screen).

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no monitor available to capture")]
    NoMonitor,
    #[error("screen capture failed: {0}")]
    Backend(String),
    #[error("screen capture is not compiled in; pass --image <path> instead")]
    Unsupported,
    #[error("cannot open image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("captured image is empty")]
    Empty,
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BadLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Where the pixels come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Primary monitor
    Screen,
    /// Image file on disk
    File(PathBuf),
}

impl CaptureSource {
    pub fn from_image_arg(image: Option<PathBuf>) -> Self {
        image.map(CaptureSource::File).unwrap_or(CaptureSource::Screen)
    }

    pub fn capture(&self) -> Result<Screenshot, CaptureError> {
        let shot = match self {
            CaptureSource::Screen => capture_primary_monitor()?,
            CaptureSource::File(path) => load_image(path)?,
        };
        tracing::info!("Captured {}x{} from {:?}", shot.width, shot.height, self);
        Ok(shot)
    }
}

/// Static RGBA8 image
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl Screenshot {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CaptureError::BadLength {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

fn load_image(path: &Path) -> Result<Screenshot, CaptureError> {
    let img = image::open(path)
        .map_err(|source| CaptureError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let (width, height) = img.dimensions();
    Screenshot::from_rgba(width, height, img.into_raw())
}

#[cfg(feature = "capture")]
fn capture_primary_monitor() -> Result<Screenshot, CaptureError> {
    let monitors = xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or_else(|| monitors.first())
        .ok_or(CaptureError::NoMonitor)?;

    tracing::debug!("Capturing monitor {:?} ({}x{})", monitor.name(), monitor.width(), monitor.height());

    let img = monitor
        .capture_image()
        .map_err(|e| CaptureError::Backend(e.to_string()))?;
    let (width, height) = (img.width(), img.height());
    Screenshot::from_rgba(width, height, img.into_raw())
}

#[cfg(not(feature = "capture"))]
fn capture_primary_monitor() -> Result<Screenshot, CaptureError> {
    Err(CaptureError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Screenshot::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Screenshot::from_rgba(2, 2, vec![0; 15]),
            Err(CaptureError::BadLength { expected: 16, actual: 15, .. })
        ));
        assert!(matches!(
            Screenshot::from_rgba(0, 2, vec![]),
            Err(CaptureError::Empty)
        ));
    }

    #[test]
    fn test_source_from_image_arg() {
        assert_eq!(CaptureSource::from_image_arg(None), CaptureSource::Screen);
        assert_eq!(
            CaptureSource::from_image_arg(Some(PathBuf::from("a.png"))),
            CaptureSource::File(PathBuf::from("a.png"))
        );
    }

    #[test]
    fn test_load_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let shot = CaptureSource::File(path).capture().unwrap();
        assert_eq!((shot.width, shot.height), (3, 2));
        assert_eq!(shot.bytes_per_row(), 12);
        assert_eq!(&shot.pixels()[0..4], &[255, 0, 0, 255]);
        assert_eq!(&shot.pixels()[20..24], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_missing_image_file() {
        let err = CaptureSource::File(PathBuf::from("/definitely/not/here.png"))
            .capture()
            .unwrap_err();
        assert!(matches!(err, CaptureError::Image { .. }));
    }
}
