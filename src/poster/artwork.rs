use image::RgbImage;
use tracing::debug;

use crate::http::HttpClient;

/// Bounding box the displayed poster is scaled into.
pub const POSTER_MAX_WIDTH: u32 = 150;
pub const POSTER_MAX_HEIGHT: u32 = 225;

/// Poster pixels ready for display, or why there are none.
#[derive(Debug, Clone)]
pub enum Artwork {
    Missing,
    Loaded(RgbImage),
    Failed(String),
}

pub fn fetch_artwork(http: &HttpClient, url: &str) -> Artwork {
    let url = url.trim();
    if url.is_empty() {
        return Artwork::Missing;
    }

    let result = http
        .get_bytes(url)
        .and_then(|bytes| decode_thumbnail(&bytes));
    match result {
        Ok(image) => {
            debug!(url, width = image.width(), height = image.height(), "artwork loaded");
            Artwork::Loaded(image)
        }
        Err(reason) => {
            debug!(url, reason = %reason, "artwork unavailable");
            Artwork::Failed(reason)
        }
    }
}

/// Decodes an image and shrinks it to fit the poster box. Smaller images are
/// left at their original size.
pub fn decode_thumbnail(bytes: &[u8]) -> Result<RgbImage, String> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| format!("image decode failed: {err}"))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width <= POSTER_MAX_WIDTH && height <= POSTER_MAX_HEIGHT {
        return Ok(decoded.to_rgb8());
    }

    let (target_width, target_height) =
        fit_within(width, height, POSTER_MAX_WIDTH, POSTER_MAX_HEIGHT);
    Ok(decoded
        .resize_exact(
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8())
}

/// Largest size with the same aspect ratio that fits inside `max_width` x `max_height`.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }
    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let fitted_width = ((f64::from(width) * scale).round() as u32).clamp(1, max_width);
    let fitted_height = ((f64::from(height) * scale).round() as u32).clamp(1, max_height);
    (fitted_width, fitted_height)
}
