use crate::{
    document::atlas::{Image, Pixels},
    effects::{
        config::AnimRange,
        context::EffectContext,
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor},
    },
    foundation::{core::Argb, error::FxResult},
};

/// Motion trail: fading copies of the selected layers of earlier frames,
/// drawn beneath each frame.
#[derive(Clone, Debug)]
pub struct TrailEffect {
    count: usize,
    spacing: usize,
    /// Fraction of alpha each ghost loses relative to the previous one.
    decay: f64,
    silhouette: bool,
    color: Argb,
}

impl Default for TrailEffect {
    fn default() -> Self {
        Self {
            count: 3,
            spacing: 1,
            decay: 0.35,
            silhouette: false,
            color: Argb::opaque(96, 160, 255),
        }
    }
}

impl TrailEffect {
    pub fn new() -> Self {
        Self::default()
    }

    fn ghost_keep(&self, generation: usize) -> f64 {
        (1.0 - self.decay).powi(generation as i32)
    }
}

impl AnimationEffect for TrailEffect {
    fn name(&self) -> &'static str {
        "trail"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("count", 3, 1, 8))
            .param(ParamDef::int("spacing", 1, 1, 8))
            .param(ParamDef::int("decay", 35, 0, 100))
            .param(ParamDef::flag("silhouette", false))
            .param(ParamDef::int("red", 96, 0, 255))
            .param(ParamDef::int("green", 160, 0, 255))
            .param(ParamDef::int("blue", 255, 0, 255));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.count = params.u32("count")? as usize;
        self.spacing = params.u32("spacing")? as usize;
        self.decay = params.float("decay")? / 100.0;
        self.silhouette = params.flag("silhouette")?;
        self.color = Argb::opaque(params.u8("red")?, params.u8("green")?, params.u8("blue")?);
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        range: AnimRange,
    ) -> FxResult<()> {
        // Ghosts are taken from the frames as they were before this pass.
        let original = ctx.act().action(action)?.frames.clone();
        let total = range.total_steps();

        for frame in range.frames() {
            let step = range.step_of(frame);
            let mut ghosts = Vec::new();
            // Oldest ghost first so it ends up at the bottom.
            for generation in (1..=self.count).rev() {
                let Some(src) = frame.checked_sub(generation * self.spacing) else {
                    continue;
                };
                if src < range.start {
                    continue;
                }
                let keep = self.ghost_keep(generation);
                for (l, layer) in original[src].layers.iter().enumerate() {
                    if !ctx.selection().layer_selected(l) {
                        continue;
                    }
                    let mut ghost = layer.clone();
                    if self.silhouette {
                        ghost.sprite = ctx.derive_image(layer, step, total, &*self)?;
                        ghost.color = Argb::WHITE.with_alpha(layer.color.a);
                    }
                    ghost.color = ghost.color.scale_alpha(keep);
                    if !ghost.color.is_transparent() {
                        ghosts.push(ghost);
                    }
                }
            }
            if ghosts.is_empty() {
                continue;
            }
            let count = ghosts.len();
            let layers = &mut ctx.act_mut().frame_mut(action, frame)?.layers;
            ghosts.append(layers);
            *layers = ghosts;
            ctx.touch_action(action);
            tracing::trace!(action, frame, count, "trail ghosts inserted");
        }
        Ok(())
    }
}

impl ImageProcessor for TrailEffect {
    /// One silhouette per source image, whatever the step.
    fn cache_key(&self, _job: &ImageJob<'_>) -> u64 {
        0
    }

    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let mut flat = image.to_rgba(job.palette);
        if let Pixels::Rgba(p) = &mut flat.pixels {
            for c in p.iter_mut().filter(|c| !c.is_transparent()) {
                *c = self.color.with_alpha(c.a);
            }
        }
        *image = flat;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/trail.rs"]
mod tests;
