use crate::{
    document::atlas::{Image, Palette},
    foundation::error::FxResult,
};

/// Pixels removed from each side of an image by a trim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrimMargins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl TrimMargins {
    pub fn is_zero(self) -> bool {
        self == Self::default()
    }
}

/// Result of trimming one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimOutcome {
    /// Nothing to remove.
    Unchanged,
    /// Cropped by the given margins.
    Cropped(TrimMargins),
    /// No pixel above the tolerance: collapsed to the 1x1 transparent sentinel.
    Emptied,
}

/// Exclusive bounding box `(x0, y0, x1, y1)` of pixels with alpha above `tolerance`.
pub fn opaque_bounds(image: &Image, palette: &Palette, tolerance: u8) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..image.height {
        for x in 0..image.width {
            if !image.is_opaque_at(x, y, palette, tolerance) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
    }
    bounds
}

/// Keeps the total trim of one axis even so the image center stays on the
/// pixel grid: when `near + far` is odd, the larger side trims one pixel less.
pub fn snap_even(near: u32, far: u32) -> (u32, u32) {
    if (near + far) % 2 == 0 {
        return (near, far);
    }
    if near > far {
        (near - 1, far)
    } else {
        (near, far - 1)
    }
}

/// Margins that would crop `image` to its opaque bounds; `None` when blank.
pub fn trim_margins(
    image: &Image,
    palette: &Palette,
    tolerance: u8,
    even: bool,
) -> Option<TrimMargins> {
    let (x0, y0, x1, y1) = opaque_bounds(image, palette, tolerance)?;
    let mut m = TrimMargins {
        left: x0,
        top: y0,
        right: image.width - x1,
        bottom: image.height - y1,
    };
    if even {
        (m.left, m.right) = snap_even(m.left, m.right);
        (m.top, m.bottom) = snap_even(m.top, m.bottom);
    }
    Some(m)
}

/// Crops `image` in place to its opaque bounds.
pub fn trim_image(
    image: &mut Image,
    palette: &Palette,
    tolerance: u8,
    even: bool,
) -> FxResult<TrimOutcome> {
    let Some(m) = trim_margins(image, palette, tolerance, even) else {
        if image.width == 1 && image.height == 1 && image.is_blank(palette, 0) {
            return Ok(TrimOutcome::Unchanged);
        }
        *image = Image::empty_like(image.kind());
        return Ok(TrimOutcome::Emptied);
    };
    if m.is_zero() {
        return Ok(TrimOutcome::Unchanged);
    }
    let w = image.width - m.left - m.right;
    let h = image.height - m.top - m.bottom;
    *image = image.crop(m.left, m.top, w, h)?;
    Ok(TrimOutcome::Cropped(m))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/trim.rs"]
mod tests;
