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
        core::Point,
        error::{FxError, FxResult},
        math::{Fnv1a64, Rng64},
    },
    geometry::bounds::{action_bounds, layer_affine, point_in},
    raster::voronoi::VoronoiPartition,
};

/// Shatters sprites into Voronoi cells that vanish one after another,
/// starting from (or, imploding, ending at) a target point.
#[derive(Clone, Debug)]
pub struct CrystalEffect {
    seeds: usize,
    seed: u64,
    target: (f64, f64),
    ease: Ease,
    implode: bool,
    partitions: HashMap<SpriteRef, VoronoiPartition>,
    /// Image-space target per source, resolved for the action being processed.
    targets: HashMap<SpriteRef, Point>,
}

impl Default for CrystalEffect {
    fn default() -> Self {
        Self {
            seeds: 24,
            seed: 0,
            target: (0.5, 0.5),
            ease: Ease::Linear,
            implode: false,
            partitions: HashMap::new(),
            targets: HashMap::new(),
        }
    }
}

impl CrystalEffect {
    pub fn new() -> Self {
        Self::default()
    }

    fn local_target(&self, source: SpriteRef) -> FxResult<Point> {
        self.targets
            .get(&source)
            .copied()
            .ok_or_else(|| FxError::processing(format!("no crystal target for {source}")))
    }

    fn partition(&self, source: SpriteRef) -> FxResult<&VoronoiPartition> {
        self.partitions
            .get(&source)
            .ok_or_else(|| FxError::processing(format!("no Voronoi cells for {source}")))
    }
}

impl AnimationEffect for CrystalEffect {
    fn name(&self) -> &'static str {
        "crystal"
    }

    fn add_properties(&self, props: &mut EffectProperties) {
        props
            .param(ParamDef::int("seeds", 24, 1, 256))
            .param(ParamDef::int("seed", 0, 0, i64::from(u32::MAX)))
            .param(ParamDef::float("target_x", 50.0, 0.0, 100.0))
            .param(ParamDef::float("target_y", 50.0, 0.0, 100.0))
            .param(ParamDef::int("ease", 0, Ease::PARAM_MIN, Ease::PARAM_MAX))
            .param(ParamDef::flag("implode", false));
    }

    fn preview_apply(&mut self, params: &ParamValues) -> FxResult<()> {
        self.seeds = params.u32("seeds")? as usize;
        self.seed = u64::from(params.u32("seed")?);
        self.target = (
            params.float("target_x")? / 100.0,
            params.float("target_y")? / 100.0,
        );
        self.ease = Ease::from_param(params.int("ease")?);
        self.implode = params.flag("implode")?;
        Ok(())
    }

    fn begin_backup(&mut self) {
        self.partitions.clear();
        self.targets.clear();
    }

    fn preview_action(&mut self, act: &Act, action: usize, selection: &Selection) -> FxResult<()> {
        self.targets.clear();
        let current = act.action(action)?;
        let Some(bounds) = action_bounds(act, current)? else {
            return Ok(());
        };
        let screen = point_in(bounds, self.target.0, self.target.1);

        // The first selected layer drawing a source fixes its image-space
        // target, so every layer on that source shares one derived image per step.
        for frame in &current.frames {
            for (l, layer) in frame.layers.iter().enumerate() {
                if !selection.layer_selected(l) || self.targets.contains_key(&layer.sprite) {
                    continue;
                }
                let image = act.image(layer.sprite)?;
                let local = layer_affine(layer, image.width, image.height).inverse() * screen;
                self.targets.insert(layer.sprite, local);
            }
        }

        for source in selected_sources(act, action, selection)? {
            if self.partitions.contains_key(&source) {
                continue;
            }
            let image = act.image(source)?;
            let mut rng = Rng64::new(sprite_seed(self.seed, source));
            let cells = VoronoiPartition::random(image.width, image.height, self.seeds, &mut rng);
            self.partitions.insert(source, cells);
        }
        Ok(())
    }

    fn process_action(
        &mut self,
        ctx: &mut EffectContext<'_>,
        action: usize,
        range: AnimRange,
    ) -> FxResult<()> {
        if self.targets.is_empty() {
            return Ok(());
        }
        let total = range.total_steps();
        for (loc, step) in ctx.selected_layers(action, range)? {
            ctx.process_layer(loc, step, total, &*self)?;
        }
        Ok(())
    }
}

impl ImageProcessor for CrystalEffect {
    fn cache_key(&self, job: &ImageJob<'_>) -> u64 {
        // Sources reused by later actions may get a different target.
        let mut h = Fnv1a64::new_default();
        h.write_u64(job.step as u64);
        if let Ok(p) = self.local_target(job.source) {
            h.write_u64(p.x.round() as i64 as u64);
            h.write_u64(p.y.round() as i64 as u64);
        }
        h.finish()
    }

    fn process_image(&self, job: &ImageJob<'_>, image: &mut Image) -> FxResult<()> {
        let cells = self.partition(job.source)?;
        if (cells.width, cells.height) != (image.width, image.height) {
            return Err(FxError::processing(format!(
                "Voronoi cells of {} are {}x{}, image is {}x{}",
                job.source, cells.width, cells.height, image.width, image.height
            )));
        }
        let target = self.local_target(job.source)?;
        let ranks = cells.ranks_from((target.x, target.y), self.implode);
        let progress = self.ease.apply(job.progress());
        let m = ranks.len() as f64;
        let w = image.width as usize;
        for (cell, &rank) in cells.cells.iter().zip(&ranks) {
            if progress < rank as f64 / m {
                continue;
            }
            for &i in cell {
                image.clear_pixel((i % w) as u32, (i / w) as u32);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/crystal.rs"]
mod tests;
