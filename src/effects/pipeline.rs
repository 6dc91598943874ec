use crate::{
    document::{
        backup::Backup,
        model::{Act, Action, Frame},
    },
    effects::{
        cleanup::{CleanupReport, run_cleanup},
        config::{CleanupOptions, EffectConfig, Selection},
        context::{EffectContext, Session},
        params::{ParamDef, ParamValues},
        traits::{AnimationEffect, EffectProperties},
    },
    foundation::error::{FxError, FxResult},
};

/// Counters of one apply or preview run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub actions: usize,
    pub frames_looped: usize,
    pub images_inserted: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cleanup: CleanupReport,
}

/// Drives one effect over a document: parameter checks, the transaction
/// boundary, per-action traversal and the post-effect cleanup.
pub struct EffectPipeline {
    effect: Box<dyn AnimationEffect>,
    props: EffectProperties,
}

impl std::fmt::Debug for EffectPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectPipeline")
            .field("effect", &self.effect.name())
            .field("props", &self.props)
            .finish()
    }
}

impl EffectPipeline {
    pub fn new(effect: Box<dyn AnimationEffect>) -> Self {
        let mut props = EffectProperties::default();
        effect.add_properties(&mut props);
        Self { effect, props }
    }

    pub fn name(&self) -> &'static str {
        self.effect.name()
    }

    pub fn schema(&self) -> &[ParamDef] {
        &self.props.params
    }

    pub fn default_selection(&self) -> &Selection {
        &self.props.selection
    }

    /// Checks `params` and hands them to the effect. Safe to call repeatedly.
    pub fn configure(
        &mut self,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> FxResult<()> {
        let values = ParamValues::resolve(&self.props.params, params)?;
        self.effect.preview_apply(&values)
    }

    /// Applies the effect inside a `backup` transaction. On failure the
    /// transaction is aborted, which restores `act`, and the error is returned.
    #[tracing::instrument(skip(self, act, backup, config), fields(effect = self.effect.name()))]
    pub fn apply(
        &mut self,
        act: &mut Act,
        backup: &mut dyn Backup,
        config: &EffectConfig,
    ) -> FxResult<ApplyStats> {
        let selection = self.prepare(act, config)?;
        backup.begin(act, self.effect.name())?;
        match self.run(act, &selection, &config.cleanup) {
            Ok(stats) => {
                backup.commit(act)?;
                Ok(stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "effect failed, aborting transaction");
                backup.abort(act);
                Err(e)
            }
        }
    }

    /// Runs the effect on a copy of `act`; the input is never modified.
    #[tracing::instrument(skip(self, act, config), fields(effect = self.effect.name()))]
    pub fn preview(&mut self, act: &Act, config: &EffectConfig) -> FxResult<Act> {
        let selection = self.prepare(act, config)?;
        let mut copy = act.clone();
        self.run(&mut copy, &selection, &config.cleanup)?;
        Ok(copy)
    }

    /// Everything that must succeed before the document may be touched.
    fn prepare(&mut self, act: &Act, config: &EffectConfig) -> FxResult<Selection> {
        if !config.effect.is_empty() && config.effect != self.effect.name() {
            return Err(FxError::invalid_param(format!(
                "config is for effect '{}', pipeline runs '{}'",
                config.effect,
                self.effect.name()
            )));
        }
        self.configure(&config.params)?;
        let selection = config
            .selection
            .clone()
            .unwrap_or_else(|| self.props.selection.clone());
        selection.validate(act)?;
        self.effect.can_apply(act, &selection)?;
        Ok(selection)
    }

    fn run(
        &mut self,
        act: &mut Act,
        selection: &Selection,
        cleanup: &CleanupOptions,
    ) -> FxResult<ApplyStats> {
        self.effect.begin_backup();
        let mut session = Session::new();
        let mut stats = ApplyStats::default();

        for a in selection.action_indices(act) {
            if selection.loop_frames
                && let Some(needed) = selection.required_frames()
            {
                stats.frames_looped += loop_frames(act.action_mut(a)?, needed);
            }
            let frame_count = act.action(a)?.frames.len();
            if frame_count == 0 {
                tracing::debug!(action = a, "skipping action without frames");
                continue;
            }
            let range = selection.anim_range(frame_count)?;

            self.effect.preview_action(act, a, selection)?;
            let mut ctx = EffectContext::new(act, &mut session, selection);
            self.effect.process_action(&mut ctx, a, range)?;

            if selection.append_empty_frame {
                act.action_mut(a)?.frames.push(Frame::default());
                session.actions.insert(a);
            }
            stats.actions += 1;
            tracing::debug!(action = a, start = range.start, len = range.len, "action processed");
        }

        (stats.cache_hits, stats.cache_misses) = session.cache.stats();
        stats.images_inserted = session.inserted.len();
        stats.cleanup = run_cleanup(act, &session, cleanup)?;
        tracing::debug!(
            actions = stats.actions,
            inserted = stats.images_inserted,
            cache_hits = stats.cache_hits,
            cache_misses = stats.cache_misses,
            "effect run finished"
        );
        Ok(stats)
    }
}

/// Extends `action` to `needed` frames by cycling its existing frames.
/// Returns the number of frames added.
fn loop_frames(action: &mut Action, needed: usize) -> usize {
    let n = action.frames.len();
    if n == 0 || n >= needed {
        return 0;
    }
    let extra: Vec<Frame> = (n..needed).map(|i| action.frames[i % n].clone()).collect();
    action.frames.extend(extra);
    needed - n
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
