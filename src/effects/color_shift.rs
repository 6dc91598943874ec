use crate::{
    animation::ease::Ease,
    document::atlas::{Image, Pixels},
    effects::{
        config::AnimRange,
        context::EffectContext,
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor},
    },
    foundation::{core::Argb, error::FxResult},
};

/// Gradual hue rotation and saturation change across the animation range.
#[derive(Clone, Debug, Default)]
pub struct ColorShiftEffect {
    /// Hue rotation in degrees reached at the last step.
    hue: f64,
    /// Relative saturation change reached at the last step, `-1..=1`.
    saturation: f64,
    ease: Ease,
}

impl ColorShiftEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationEffect for ColorShiftEffect {
    fn name(&self) -> &'static str {
        "color_shift"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("hue", 0, -180, 180))
            .param(ParamDef::int("saturation", 0, -100, 100))
            .param(ParamDef::int("ease", 0, Ease::PARAM_MIN, Ease::PARAM_MAX));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.hue = params.float("hue")?;
        self.saturation = params.float("saturation")? / 100.0;
        self.ease = Ease::from_param(params.int("ease")?);
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        range: AnimRange,
    ) -> FxResult<()> {
        let total = range.total_steps();
        for (loc, step) in ctx.selected_layers(action, range)? {
            ctx.process_layer(loc, step, total, &*self)?;
        }
        Ok(())
    }
}

impl ImageProcessor for ColorShiftEffect {
    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let e = self.ease.apply(job.progress());
        let (dh, ds) = (self.hue * e, self.saturation * e);
        let mut out = image.to_rgba(job.palette);
        if let Pixels::Rgba(p) = &mut out.pixels {
            for c in p.iter_mut().filter(|c| !c.is_transparent()) {
                *c = shift(*c, dh, ds);
            }
        }
        *image = out;
        Ok(())
    }
}

/// Rotates the hue by `dh` degrees and scales saturation by `1 + ds`.
pub fn shift(c: Argb, dh: f64, ds: f64) -> Argb {
    let (h, s, v) = to_hsv(c);
    let h = (h + dh).rem_euclid(360.0);
    let s = (s * (1.0 + ds)).clamp(0.0, 1.0);
    from_hsv(h, s, v, c.a)
}

fn to_hsv(c: Argb) -> (f64, f64, f64) {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let h = if d == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { d / max };
    (h, s, max)
}

fn from_hsv(h: f64, s: f64, v: f64, a: u8) -> Argb {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Argb::new(a, to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_shift.rs"]
mod tests;
