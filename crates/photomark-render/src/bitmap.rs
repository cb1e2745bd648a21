//! Base image decoding, ownership and the stale-load guard.

use thiserror::Error;
use tiny_skia::{IntSize, Pixmap};

/// Image decoding errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode base image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("base image dimensions {width}x{height} are not representable")]
    Dimensions { width: u32, height: u32 },
}

/// A decoded base photo at its native resolution.
///
/// The handle exclusively owns the decoded pixels. `release` frees them
/// early and is safe to call any number of times; dropping the handle
/// releases too, so every exit path of a compositing call gives the memory
/// back.
#[derive(Debug)]
pub struct BaseImage {
    pixmap: Option<Pixmap>,
    width: u32,
    height: u32,
}

impl BaseImage {
    /// Decode an image from its encoded bytes (PNG, JPEG or WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let size = IntSize::from_wh(width, height)
            .ok_or(ImageError::Dimensions { width, height })?;
        let pixmap = Pixmap::from_vec(premultiply_alpha(rgba.into_raw()), size)
            .ok_or(ImageError::Dimensions { width, height })?;

        log::debug!("decoded base image at {}x{}", width, height);
        Ok(Self {
            pixmap: Some(pixmap),
            width,
            height,
        })
    }

    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The decoded pixels, or `None` after release.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Whether the pixels were already released.
    pub fn is_released(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Free the decoded pixels. Idempotent and never fails; releasing an
    /// already-released handle is a no-op.
    pub fn release(&mut self) {
        if self.pixmap.take().is_some() {
            log::debug!("released base image ({}x{})", self.width, self.height);
        }
    }
}

impl Drop for BaseImage {
    fn drop(&mut self) {
        self.release();
    }
}

/// tiny-skia stores premultiplied alpha; encoded images carry straight alpha.
fn premultiply_alpha(mut data: Vec<u8>) -> Vec<u8> {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a < 255 {
            px[0] = ((px[0] as u16 * a) / 255) as u8;
            px[1] = ((px[1] as u16 * a) / 255) as u8;
            px[2] = ((px[2] as u16 * a) / 255) as u8;
        }
    }
    data
}

/// Ticket identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Guards against stale decode results when the editor is re-pointed at a
/// different photo before the previous load finished.
///
/// Begin a load before handing the bytes to whatever fetches/decodes them;
/// complete it with the ticket once the bytes arrive. Completing with a
/// superseded ticket discards the result instead of applying it.
#[derive(Debug, Default)]
pub struct ImageLoader {
    generation: u64,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, invalidating all previously issued tickets.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Finish a load. Returns `Ok(None)` when the ticket was superseded by a
    /// newer `begin_load`; decode failures propagate so the caller can show
    /// the image-less state.
    pub fn complete(&self, ticket: LoadTicket, bytes: &[u8]) -> Result<Option<BaseImage>, ImageError> {
        if ticket.0 != self.generation {
            log::debug!(
                "discarding stale image decode (ticket {} superseded by {})",
                ticket.0,
                self.generation
            );
            return Ok(None);
        }
        BaseImage::decode(bytes).map(Some)
    }
}
