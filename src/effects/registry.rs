use std::collections::BTreeMap;

use crate::{
    document::{backup::Backup, model::Act},
    effects::{
        aura::AuraEffect,
        color_shift::ColorShiftEffect,
        config::EffectConfig,
        crystal::CrystalEffect,
        interpolate::InterpolateEffect,
        outline::OutlineEffect,
        params::ParamDef,
        pipeline::{ApplyStats, EffectPipeline},
        stripe::StripeEffect,
        trail::TrailEffect,
        traits::AnimationEffect,
    },
    foundation::error::{FxError, FxResult},
};

pub type EffectCtor = fn() -> Box<dyn AnimationEffect>;

/// Effects known by name.
#[derive(Clone, Debug)]
pub struct EffectRegistry {
    ctors: BTreeMap<&'static str, EffectCtor>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl EffectRegistry {
    /// A registry without any effect.
    pub fn empty() -> Self {
        Self {
            ctors: BTreeMap::new(),
        }
    }

    pub fn with_builtin() -> Self {
        let mut r = Self::empty();
        r.register(|| Box::new(InterpolateEffect::new()));
        r.register(|| Box::new(CrystalEffect::new()));
        r.register(|| Box::new(StripeEffect::new()));
        r.register(|| Box::new(TrailEffect::new()));
        r.register(|| Box::new(OutlineEffect::new()));
        r.register(|| Box::new(AuraEffect::new()));
        r.register(|| Box::new(ColorShiftEffect::new()));
        r
    }

    /// Registers `ctor` under the name of the effect it builds, replacing any
    /// previous effect of that name.
    pub fn register(&mut self, ctor: EffectCtor) {
        let name = ctor().name();
        self.ctors.insert(name, ctor);
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ctors.keys().copied()
    }

    pub fn create(&self, name: &str) -> FxResult<EffectPipeline> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| FxError::invalid_param(format!("unknown effect '{name}'")))?;
        Ok(EffectPipeline::new(ctor()))
    }

    pub fn schema(&self, name: &str) -> FxResult<Vec<ParamDef>> {
        Ok(self.create(name)?.schema().to_vec())
    }

    /// Parameter schema of every registered effect, by name.
    pub fn schemas(&self) -> BTreeMap<&'static str, Vec<ParamDef>> {
        self.ctors
            .iter()
            .map(|(&name, ctor)| (name, EffectPipeline::new(ctor()).schema().to_vec()))
            .collect()
    }

    /// Builds the effect named by `config` and applies it inside `backup`.
    pub fn apply(
        &self,
        act: &mut Act,
        backup: &mut dyn Backup,
        config: &EffectConfig,
    ) -> FxResult<ApplyStats> {
        self.create(&config.effect)?.apply(act, backup, config)
    }

    /// Builds the effect named by `config` and runs it on a copy of `act`.
    pub fn preview(&self, act: &Act, config: &EffectConfig) -> FxResult<Act> {
        self.create(&config.effect)?.preview(act, config)
    }
}
