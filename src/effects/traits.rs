use crate::{
    document::{
        atlas::{Image, Palette, SpriteRef},
        model::{Act, Layer},
    },
    effects::{
        config::{AnimRange, Selection},
        context::EffectContext,
        params::{ParamDef, ParamValues},
    },
    foundation::error::FxResult,
};

/// What an effect declares before it is configured: its parameter schema and
/// the selection used when a config does not carry one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectProperties {
    pub params: Vec<ParamDef>,
    pub selection: Selection,
}

impl EffectProperties {
    pub fn param(&mut self, def: ParamDef) -> &mut Self {
        self.params.push(def);
        self
    }
}

/// Lifecycle of one effect. The pipeline calls the hooks in a fixed order:
/// `add_properties`, `preview_apply` (any number of times), `begin_backup`,
/// then `preview_action` and `process_action` per selected action.
pub trait AnimationEffect {
    fn name(&self) -> &'static str;

    fn add_properties(&self, props: &mut EffectProperties);

    /// Reads checked parameter values into the effect's options. Must not
    /// depend on the document.
    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()>;

    /// Precondition checked before the transaction opens.
    fn can_apply(&self, _act: &Act, _selection: &Selection) -> FxResult<()> {
        Ok(())
    }

    /// Start of a committing (or previewing) run; drops per-run state.
    fn begin_backup(&mut self) {}

    /// Deterministic per-action precomputation.
    fn preview_action(&mut self, _act: &Act, _action: usize, _selection: &Selection) -> FxResult<()> {
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        range: AnimRange,
    ) -> FxResult<()>;
}

/// One derived-image request.
#[derive(Clone, Copy, Debug)]
pub struct ImageJob<'a> {
    pub source: SpriteRef,
    /// Layer that asked for the image, as it was before rebinding.
    pub layer: &'a Layer,
    pub step: usize,
    pub total_steps: usize,
    pub palette: &'a Palette,
}

impl ImageJob<'_> {
    pub fn progress(&self) -> f64 {
        (self.step as f64 / self.total_steps.max(1) as f64).clamp(0.0, 1.0)
    }
}

/// Per-pixel half of an effect.
pub trait ImageProcessor {
    /// Variant key of the derived image; jobs sharing a source and key share
    /// one atlas entry.
    fn cache_key(&self, job: &ImageJob<'_>) -> u64 {
        job.step as u64
    }

    /// Transforms a private copy of the source image. The image may be
    /// replaced, e.g. by a direct-color or padded version.
    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()>;
}
