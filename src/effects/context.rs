use std::collections::BTreeSet;

use crate::{
    document::{
        atlas::{Image, SpriteRef},
        model::{Act, Layer, LayerLoc},
    },
    effects::{
        cache::SpriteTransformCache,
        config::{AnimRange, Selection},
        traits::{ImageJob, ImageProcessor},
    },
    foundation::error::FxResult,
};

/// State of one apply (or preview) run. Created fresh when the transaction
/// opens, so nothing derived in an earlier run can be reused.
#[derive(Debug, Default)]
pub struct Session {
    pub cache: SpriteTransformCache,
    /// Atlas images created during this run.
    pub inserted: BTreeSet<SpriteRef>,
    /// Actions whose frames were processed.
    pub actions: BTreeSet<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Document access handed to [`crate::effects::traits::AnimationEffect::process_action`].
pub struct EffectContext<'a> {
    act: &'a mut Act,
    session: &'a mut Session,
    selection: &'a Selection,
}

impl<'a> EffectContext<'a> {
    pub fn new(act: &'a mut Act, session: &'a mut Session, selection: &'a Selection) -> Self {
        Self {
            act,
            session,
            selection,
        }
    }

    pub fn act(&self) -> &Act {
        self.act
    }

    pub fn act_mut(&mut self) -> &mut Act {
        self.act
    }

    pub fn selection(&self) -> &Selection {
        self.selection
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    /// Adds a new image to the atlas and tracks it for cleanup.
    pub fn insert_image(&mut self, image: Image) -> FxResult<SpriteRef> {
        let sprite = self.act.insert_image(image)?;
        self.session.inserted.insert(sprite);
        Ok(sprite)
    }

    /// Derived image of `layer.sprite` for `step`: reused from the cache when
    /// the processor's key matches, otherwise copied, processed and inserted.
    pub fn derive_image<P>(
        &mut self,
        layer: &Layer,
        step: usize,
        total_steps: usize,
        processor: &P,
    ) -> FxResult<SpriteRef>
    where
        P: ImageProcessor + ?Sized,
    {
        let source = layer.sprite;
        let (key, image) = {
            let job = ImageJob {
                source,
                layer,
                step,
                total_steps,
                palette: &self.act.palette,
            };
            let key = processor.cache_key(&job);
            if let Some(hit) = self.session.cache.lookup(source, key) {
                return Ok(hit);
            }
            let mut image = self.act.image(source)?.clone();
            processor.process_image(&job, &mut image)?;
            (key, image)
        };
        let derived = self.insert_image(image)?;
        self.session.cache.insert(source, key, derived);
        Ok(derived)
    }

    /// Rebinds the layer at `loc` to its derived image for `step`.
    pub fn process_layer<P>(
        &mut self,
        loc: LayerLoc,
        step: usize,
        total_steps: usize,
        processor: &P,
    ) -> FxResult<SpriteRef>
    where
        P: ImageProcessor + ?Sized,
    {
        let layer = self.act.layer(loc)?.clone();
        let derived = self.derive_image(&layer, step, total_steps, processor)?;
        self.act.layer_mut(loc)?.sprite = derived;
        self.session.actions.insert(loc.action);
        Ok(derived)
    }

    /// Records that frames of `action` changed without going through
    /// [`Self::process_layer`].
    pub fn touch_action(&mut self, action: usize) {
        self.session.actions.insert(action);
    }

    /// Selected layers of the frames in `range`, with their animation step.
    pub fn selected_layers(&self, action: usize, range: AnimRange) -> FxResult<Vec<(LayerLoc, usize)>> {
        let mut out = Vec::new();
        for frame in range.frames() {
            let count = self.act.frame(action, frame)?.layers.len();
            for layer in (0..count).filter(|&l| self.selection.layer_selected(l)) {
                out.push((
                    LayerLoc {
                        action,
                        frame,
                        layer,
                    },
                    range.step_of(frame),
                ));
            }
        }
        Ok(out)
    }
}

/// Distinct source images drawn by the selected layers of `action`.
pub fn selected_sources(act: &Act, action: usize, selection: &Selection) -> FxResult<BTreeSet<SpriteRef>> {
    let mut out = BTreeSet::new();
    for frame in &act.action(action)?.frames {
        for (l, layer) in frame.layers.iter().enumerate() {
            if selection.layer_selected(l) {
                out.insert(layer.sprite);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/context.rs"]
mod tests;
