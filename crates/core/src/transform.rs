//! Time/pixel mapping for a [`Viewport`] snapshot.
//!
//! The two functions are exact inverses (up to floating-point rounding);
//! zoom-about-cursor and click-to-time both rely on that.

use crate::model::Viewport;

/// Pixel column (relative to the surface's left edge) of time `t` in ms.
#[inline]
pub fn time_to_pixel(t: f64, viewport: &Viewport) -> f64 {
    (t - viewport.start_time()) * viewport.scale() - viewport.offset_x()
}

/// Time in ms under pixel column `p`.
#[inline]
pub fn pixel_to_time(p: f64, viewport: &Viewport) -> f64 {
    (p + viewport.offset_x()) / viewport.scale() + viewport.start_time()
}
