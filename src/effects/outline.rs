use crate::{
    document::atlas::{Image, Texel},
    effects::{
        config::AnimRange,
        context::EffectContext,
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor},
    },
    foundation::{core::Argb, error::FxResult},
    raster::flood::exterior_mask,
};

/// Strokes a solid ring around every opaque region of the selected sprites.
#[derive(Clone, Debug)]
pub struct OutlineEffect {
    thickness: u32,
    color: Argb,
    outer_only: bool,
}

impl Default for OutlineEffect {
    fn default() -> Self {
        Self {
            thickness: 1,
            color: Argb::opaque(0, 0, 0),
            outer_only: false,
        }
    }
}

impl OutlineEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationEffect for OutlineEffect {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("thickness", 1, 1, 8))
            .param(ParamDef::int("red", 0, 0, 255))
            .param(ParamDef::int("green", 0, 0, 255))
            .param(ParamDef::int("blue", 0, 0, 255))
            .param(ParamDef::int("alpha", 255, 0, 255))
            .param(ParamDef::flag("outer_only", false));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.thickness = params.u32("thickness")?;
        self.color = Argb::new(
            params.u8("alpha")?,
            params.u8("red")?,
            params.u8("green")?,
            params.u8("blue")?,
        );
        self.outer_only = params.flag("outer_only")?;
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

impl ImageProcessor for OutlineEffect {
    fn cache_key(&self, _job: &ImageJob<'_>) -> u64 {
        0
    }

    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let t = self.thickness;
        let mut out = image.padded(t);
        let (w, h) = (out.width, out.height);
        let opaque: Vec<bool> = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| out.is_opaque_at(x, y, job.palette, 0))
            .collect();
        let outside = self
            .outer_only
            .then(|| exterior_mask(&out, job.palette, 0));

        let r = t as i32;
        let mut ring = vec![false; opaque.len()];
        for (i, _) in opaque.iter().enumerate().filter(|(_, o)| **o) {
            let (cx, cy) = ((i % w as usize) as i32, (i / w as usize) as i32);
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    let (x, y) = (cx + dx, cy + dy);
                    if !out.in_bounds(x, y) {
                        continue;
                    }
                    let j = y as usize * w as usize + x as usize;
                    if !opaque[j] {
                        ring[j] = true;
                    }
                }
            }
        }

        let stroke = Texel::Color(self.color);
        for (j, _) in ring.iter().enumerate().filter(|(_, r)| **r) {
            if outside.as_ref().is_some_and(|o| !o[j]) {
                continue;
            }
            let (x, y) = ((j % w as usize) as u32, (j / w as usize) as u32);
            out.set_texel(x, y, stroke, job.palette);
        }
        *image = out;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/outline.rs"]
mod tests;
