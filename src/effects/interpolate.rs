use crate::{
    animation::{
        ease::Ease,
        interp::{InterpFlags, LayerBlend, interpolate_frame},
    },
    document::model::Act,
    effects::{
        config::{AnimRange, Selection},
        context::EffectContext,
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties},
    },
    foundation::error::{FxError, FxResult},
};

const MAX_FRAME_INDEX: i64 = 9999;

/// Inserts blended in-betweens after the start keyframe.
#[derive(Clone, Debug)]
pub struct InterpolateEffect {
    from_frame: usize,
    to_frame: usize,
    frames: usize,
    blend: LayerBlend,
}

impl Default for InterpolateEffect {
    fn default() -> Self {
        Self {
            from_frame: 0,
            to_frame: 1,
            frames: 1,
            blend: LayerBlend::default(),
        }
    }
}

impl InterpolateEffect {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_frames(&self, frame_count: usize, action: usize) -> FxResult<()> {
        if self.from_frame >= self.to_frame {
            return Err(FxError::selection(format!(
                "to_frame ({}) must come after from_frame ({})",
                self.to_frame, self.from_frame
            )));
        }
        if self.to_frame >= frame_count {
            return Err(FxError::selection(format!(
                "to_frame {} is out of bounds for action {action} ({frame_count} frames)",
                self.to_frame
            )));
        }
        Ok(())
    }
}

impl AnimationEffect for InterpolateEffect {
    fn name(&self) -> &'static str {
        "interpolate"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("from_frame", 0, 0, MAX_FRAME_INDEX))
            .param(ParamDef::int("to_frame", 1, 0, MAX_FRAME_INDEX))
            .param(ParamDef::int("frames", 1, 1, 30))
            .param(ParamDef::int("ease", 0, Ease::PARAM_MIN, Ease::PARAM_MAX))
            .param(ParamDef::flag("offset", true))
            .param(ParamDef::flag("angle", true))
            .param(ParamDef::flag("scale", true))
            .param(ParamDef::flag("color", true))
            .param(ParamDef::flag("mirror", true));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.from_frame = params.u32("from_frame")? as usize;
        self.to_frame = params.u32("to_frame")? as usize;
        self.frames = params.u32("frames")? as usize;
        let flags = InterpFlags {
            offset: params.flag("offset")?,
            angle: params.flag("angle")?,
            scale: params.flag("scale")?,
            color: params.flag("color")?,
            mirror: params.flag("mirror")?,
        };
        self.blend = LayerBlend::new(Ease::from_param(params.int("ease")?), flags);
        Ok(())
    }

    fn can_apply(&self, act: &Act, selection: &Selection) -> FxResult<()> {
        for a in selection.action_indices(act) {
            self.check_frames(act.action(a)?.frames.len(), a)?;
        }
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        _range: AnimRange,
    ) -> FxResult<()> {
        let act = ctx.act();
        let frames = &act.action(action)?.frames;
        self.check_frames(frames.len(), action)?;
        let a = &frames[self.from_frame];
        let b = &frames[self.to_frame];

        let k = self.frames;
        let mut inbetweens = Vec::with_capacity(k);
        for i in 1..=k {
            let t = i as f64 / (k + 1) as f64;
            inbetweens.push(interpolate_frame(act, a, b, t, &self.blend)?);
        }

        // In-betweens go right after the start key; existing frames are kept.
        let (from, to) = (self.from_frame, self.to_frame);
        let at = from + 1;
        let frames = &mut ctx.act_mut().action_mut(action)?.frames;
        let tail = frames.split_off(at);
        frames.extend(inbetweens);
        frames.extend(tail);
        ctx.touch_action(action);
        tracing::debug!(action, from, to, inserted = k, "keyframes interpolated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/interpolate.rs"]
mod tests;
