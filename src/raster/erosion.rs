use crate::{
    document::atlas::{Image, Palette, Texel},
    foundation::math::Rng64,
    raster::line::draw_line,
};

/// Shape of a column erosion ("melting") pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErosionOptions {
    /// Columns per stripe; every column of a stripe shares one jitter value.
    pub stripe_width: u32,
    /// Maximum rows a stripe's front lags behind the nominal front.
    pub jitter: u32,
    /// Whether odd stripes drip instead of clearing cleanly.
    pub smear: bool,
    /// Largest number of rows above the front searched for a drip color;
    /// each stripe draws its own window in `1..=smear_window`.
    pub smear_window: u32,
    /// Maximum drip length in rows.
    pub drip: u32,
    /// Horizontal drift of a drip, in pixels per four rows.
    pub slant: i32,
}

impl Default for ErosionOptions {
    fn default() -> Self {
        Self {
            stripe_width: 2,
            jitter: 8,
            smear: true,
            smear_window: 4,
            drip: 6,
            slant: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Stripe {
    lag: u32,
    drip: u32,
    window: u32,
}

/// Per-stripe random draws for one source image, fixed up front so every
/// step of the animation erodes along the same ragged front.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnErosion {
    opts: ErosionOptions,
    stripes: Vec<Stripe>,
}

impl ColumnErosion {
    pub fn new(width: u32, opts: ErosionOptions, rng: &mut Rng64) -> Self {
        let stripe_width = opts.stripe_width.max(1);
        let count = width.div_ceil(stripe_width).max(1);
        let stripes = (0..count)
            .map(|_| Stripe {
                lag: rng.below(opts.jitter + 1),
                drip: rng.below(opts.drip + 1),
                window: 1 + rng.below(opts.smear_window.max(1)),
            })
            .collect();
        Self {
            opts: ErosionOptions {
                stripe_width,
                ..opts
            },
            stripes,
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_of(&self, x: u32) -> (usize, Stripe) {
        let i = ((x / self.opts.stripe_width) as usize).min(self.stripes.len() - 1);
        (i, self.stripes[i])
    }

    /// Rows eroded from the bottom of column `x` at eased `progress` in `[0, 1]`.
    ///
    /// At `progress == 1` every column is eroded by at least the image height.
    pub fn front_height(&self, x: u32, height: u32, progress: f64) -> i64 {
        let (_, stripe) = self.stripe_of(x);
        let span = f64::from(height) + f64::from(self.opts.jitter);
        (progress.clamp(0.0, 1.0) * span).round() as i64 - i64::from(stripe.lag)
    }

    /// Erodes `image` in place; returns the number of pixels changed.
    pub fn apply(&self, image: &mut Image, palette: &Palette, progress: f64) -> usize {
        let mut changed = 0;
        for x in 0..image.width {
            let Some(bottom) = column_bottom(image, palette, x) else {
                continue;
            };
            let h = self.front_height(x, image.height, progress);
            if h <= 0 {
                continue;
            }
            let front = (i64::from(bottom) - h).max(0) as u32;
            let source = self.smear_color(image, palette, x, front);
            for y in front..bottom {
                if image.is_opaque_at(x, y, palette, 0) {
                    image.clear_pixel(x, y);
                    changed += 1;
                }
            }
            if let Some((value, len)) = source {
                let dx = self.opts.slant * len as i32 / 4;
                let from = (x as i32, front as i32);
                let to = (x as i32 + dx, (front + len) as i32 - 1);
                changed += draw_line(image, from, to, value, palette);
            }
        }
        changed
    }

    /// Drip color and length for a smear column: the lowest opaque pixel within
    /// the window above the front.
    fn smear_color(&self, image: &Image, palette: &Palette, x: u32, front: u32) -> Option<(Texel, u32)> {
        let (i, stripe) = self.stripe_of(x);
        if !self.opts.smear || i % 2 == 0 || stripe.drip == 0 {
            return None;
        }
        let top = front.saturating_sub(stripe.window);
        (top..front)
            .rev()
            .find(|&y| image.is_opaque_at(x, y, palette, 0))
            .map(|y| (image.texel(x, y), stripe.drip))
    }
}

/// One past the lowest opaque row of column `x`.
fn column_bottom(image: &Image, palette: &Palette, x: u32) -> Option<u32> {
    (0..image.height)
        .rev()
        .find(|&y| image.is_opaque_at(x, y, palette, 0))
        .map(|y| y + 1)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/erosion.rs"]
mod tests;
