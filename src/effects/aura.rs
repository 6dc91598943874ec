use std::f64::consts::TAU;

use crate::{
    document::atlas::{Image, Pixels},
    effects::{
        config::AnimRange,
        context::EffectContext,
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor},
    },
    foundation::{
        core::Argb,
        error::FxResult,
        math::mul_div255_u8,
    },
};

/// Pulsing glow drawn behind the selected layers.
#[derive(Clone, Debug)]
pub struct AuraEffect {
    radius: u32,
    color: Argb,
    period: usize,
    min_alpha: u8,
    max_alpha: u8,
}

impl Default for AuraEffect {
    fn default() -> Self {
        Self {
            radius: 3,
            color: Argb::opaque(255, 220, 96),
            period: 8,
            min_alpha: 64,
            max_alpha: 192,
        }
    }
}

impl AuraEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glow alpha at `step`: `min_alpha` at the start of each period,
    /// `max_alpha` halfway through.
    pub fn pulse(&self, step: usize) -> u8 {
        let phase = (step % self.period.max(1)) as f64 / self.period.max(1) as f64;
        let k = 0.5 - 0.5 * (TAU * phase).cos();
        let (lo, hi) = (f64::from(self.min_alpha), f64::from(self.max_alpha));
        (lo + (hi - lo) * k).round().clamp(0.0, 255.0) as u8
    }
}

impl AnimationEffect for AuraEffect {
    fn name(&self) -> &'static str {
        "aura"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("radius", 3, 1, 16))
            .param(ParamDef::int("red", 255, 0, 255))
            .param(ParamDef::int("green", 220, 0, 255))
            .param(ParamDef::int("blue", 96, 0, 255))
            .param(ParamDef::int("period", 8, 1, 64))
            .param(ParamDef::int("min_alpha", 64, 0, 255))
            .param(ParamDef::int("max_alpha", 192, 0, 255));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.radius = params.u32("radius")?;
        self.color = Argb::opaque(params.u8("red")?, params.u8("green")?, params.u8("blue")?);
        self.period = params.u32("period")? as usize;
        self.min_alpha = params.u8("min_alpha")?;
        self.max_alpha = params.u8("max_alpha")?;
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        range: AnimRange,
    ) -> FxResult<()> {
        let total = range.total_steps();
        for frame in range.frames() {
            let step = range.step_of(frame);
            let pulse = self.pulse(step);
            let current = ctx.act().frame(action, frame)?.layers.clone();
            let mut layers = Vec::with_capacity(current.len() * 2);
            for (l, layer) in current.into_iter().enumerate() {
                if ctx.selection().layer_selected(l) {
                    let mut glow = layer.clone();
                    glow.sprite = ctx.derive_image(&layer, step, total, &*self)?;
                    glow.color = Argb::WHITE.with_alpha(mul_div255_u8(
                        u16::from(pulse),
                        u16::from(layer.color.a),
                    ));
                    layers.push(glow);
                }
                layers.push(layer);
            }
            ctx.act_mut().frame_mut(action, frame)?.layers = layers;
            ctx.touch_action(action);
        }
        Ok(())
    }
}

impl ImageProcessor for AuraEffect {
    /// The glow image only depends on the source; the pulse lives in the tint.
    fn cache_key(&self, _job: &ImageJob<'_>) -> u64 {
        0
    }

    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let r = self.radius as i32;
        let src = image.padded(self.radius);
        let (w, h) = (src.width as i32, src.height as i32);
        let mut alpha = vec![0u8; src.len()];
        for y in 0..h {
            for x in 0..w {
                let a = src.alpha_at(x as u32, y as u32, job.palette);
                if a == 0 {
                    continue;
                }
                for dy in -r..=r {
                    for dx in -r..=r {
                        let (nx, ny) = (x + dx, y + dy);
                        if nx < 0 || ny < 0 || nx >= w || ny >= h {
                            continue;
                        }
                        let d = f64::from(dx * dx + dy * dy).sqrt();
                        if d > f64::from(r) {
                            continue;
                        }
                        let falloff = 1.0 - d / f64::from(r + 1);
                        let v = (f64::from(a) * falloff).round() as u8;
                        let i = (ny * w + nx) as usize;
                        alpha[i] = alpha[i].max(v);
                    }
                }
            }
        }
        let pixels = alpha
            .into_iter()
            .map(|a| {
                if a == 0 {
                    Argb::TRANSPARENT
                } else {
                    self.color.with_alpha(a)
                }
            })
            .collect();
        *image = Image {
            width: src.width,
            height: src.height,
            pixels: Pixels::Rgba(pixels),
        };
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/aura.rs"]
mod tests;
