//! Vertical sky gradient used for the game icon.
//!
//! Each row blends from a deep sky blue at the top towards a light sky blue at
//! the bottom; all pixels within a row share the same color.

use crate::png::{validate_dimensions, EncodeError, RasterImage, Rgb};
use serde::{Deserialize, Serialize};

/// Color of the top row.
pub const SKY_TOP: Rgb = Rgb::new(30, 144, 255);

/// Color the gradient approaches at the bottom edge (never quite reached).
pub const SKY_BOTTOM: Rgb = Rgb::new(135, 206, 255);

/// Default icon size in pixels.
pub const ICON_SIZE: u32 = 512;

/// Geometry of a generated icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for IconGeometry {
    fn default() -> Self {
        Self {
            width: ICON_SIZE,
            height: ICON_SIZE,
        }
    }
}

/// Interpolate one channel, truncating toward zero.
#[inline]
fn lerp_channel(top: u8, bottom: u8, row: u32, height: u32) -> u8 {
    let span = bottom as i64 - top as i64;
    let offset = span * row as i64 / height as i64;
    (top as i64 + offset) as u8
}

/// Gradient color for `row` of an image `height` rows tall.
pub fn sky_gradient(row: u32, height: u32) -> Rgb {
    if height == 0 {
        return SKY_TOP;
    }
    let [tr, tg, tb] = SKY_TOP.0;
    let [br, bg, bb] = SKY_BOTTOM.0;
    Rgb::new(
        lerp_channel(tr, br, row, height),
        lerp_channel(tg, bg, row, height),
        lerp_channel(tb, bb, row, height),
    )
}

/// Materialize the sky gradient icon.
///
/// Fails with [`EncodeError::InvalidGeometry`] before allocating any pixels
/// when either dimension is zero or above the PNG limit.
pub fn sky_icon(geometry: IconGeometry) -> Result<RasterImage, EncodeError> {
    validate_dimensions(geometry.width, geometry.height)?;
    Ok(RasterImage::from_fn(geometry.width, geometry.height, |row, _| {
        sky_gradient(row, geometry.height)
    }))
}
