use std::collections::HashMap;

use crate::{
    animation::ease::Ease,
    document::{
        atlas::{Image, SpriteRef},
        model::Act,
    },
    effects::{
        config::{AnimRange, Selection},
        context::{EffectContext, selected_sources},
        params::{ParamDef, ParamValues},
        sprite_seed,
        traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor},
    },
    foundation::{
        error::{FxError, FxResult},
        math::Rng64,
    },
    raster::erosion::{ColumnErosion, ErosionOptions},
};

/// Melts sprites from the bottom up in ragged vertical stripes.
#[derive(Clone, Debug, Default)]
pub struct StripeEffect {
    seed: u64,
    opts: ErosionOptions,
    ease: Ease,
    plans: HashMap<SpriteRef, ColumnErosion>,
}

impl StripeEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationEffect for StripeEffect {
    fn name(&self) -> &'static str {
        "stripe"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        let d = ErosionOptions::default();
        props
            .param(ParamDef::int("seed", 0, 0, i64::from(u32::MAX)))
            .param(ParamDef::int("stripe_width", i64::from(d.stripe_width), 1, 16))
            .param(ParamDef::int("jitter", i64::from(d.jitter), 0, 64))
            .param(ParamDef::flag("smear", d.smear))
            .param(ParamDef::int("smear_window", i64::from(d.smear_window), 1, 16))
            .param(ParamDef::int("drip", i64::from(d.drip), 0, 64))
            .param(ParamDef::int("slant", i64::from(d.slant), -4, 4))
            .param(ParamDef::int("ease", 0, Ease::PARAM_MIN, Ease::PARAM_MAX));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.seed = u64::from(params.u32("seed")?);
        self.opts = ErosionOptions {
            stripe_width: params.u32("stripe_width")?,
            jitter: params.u32("jitter")?,
            smear: params.flag("smear")?,
            smear_window: params.u32("smear_window")?,
            drip: params.u32("drip")?,
            slant: params.int("slant")? as i32,
        };
        self.ease = Ease::from_param(params.int("ease")?);
        Ok(())
    }

    fn begin_backup(&mut self) {
        self.plans.clear();
    }

    fn preview_action(&mut self, act: &Act, action: usize, selection: &Selection) -> FxResult<()> {
        for source in selected_sources(act, action, selection)? {
            if self.plans.contains_key(&source) {
                continue;
            }
            let width = act.image(source)?.width;
            let mut rng = Rng64::new(sprite_seed(self.seed, source));
            self.plans
                .insert(source, ColumnErosion::new(width, self.opts, &mut rng));
        }
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

impl ImageProcessor for StripeEffect {
    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let plan = self
            .plans
            .get(&job.source)
            .ok_or_else(|| FxError::processing(format!("no stripe plan for {}", job.source)))?;
        let progress = self.ease.apply(job.progress());
        let changed = plan.apply(image, job.palette, progress);
        tracing::trace!(source = %job.source, step = job.step, changed, "stripe eroded");
        Ok(())
    }
}
