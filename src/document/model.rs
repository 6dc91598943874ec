use crate::{
    document::atlas::{Image, ImageKind, Palette, SpriteAtlas, SpriteRef},
    foundation::core::{Argb, Offset, Vec2},
    foundation::error::{FxError, FxResult},
};

/// Number of facing directions grouped under one logical animation type.
pub const DIRECTIONS: usize = 8;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One drawable element of a frame.
pub struct Layer {
    /// Atlas image drawn by this layer.
    pub sprite: SpriteRef,
    /// Screen offset of the image center.
    pub offset: Offset,
    /// Clockwise rotation in degrees, `0..360`.
    #[serde(default)]
    pub rotation: i32,
    /// Per-axis scale; mirroring is carried by [`Layer::mirror`].
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    /// Horizontal flip.
    #[serde(default)]
    pub mirror: bool,
    /// Tint multiplied over the image, including the layer alpha.
    #[serde(default)]
    pub color: Argb,
}

fn unit_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

impl Layer {
    pub fn new(sprite: SpriteRef) -> Self {
        Self {
            sprite,
            offset: Offset::default(),
            rotation: 0,
            scale: unit_scale(),
            mirror: false,
            color: Argb::WHITE,
        }
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset = Offset::new(x, y);
        self
    }

    pub fn with_color(mut self, color: Argb) -> Self {
        self.color = color;
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees.rem_euclid(360);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Attachment point read by skeleton composition; never drawn.
pub struct Anchor {
    pub offset: Offset,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One timestep of an action: layers in draw order (later is on top).
pub struct Frame {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub sound: Option<usize>,
}

impl Frame {
    pub fn with_layers(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ordered sequence of frames.
pub struct Action {
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Position of one layer inside an Act.
pub struct LayerLoc {
    pub action: usize,
    pub frame: usize,
    pub layer: usize,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Animation document: actions plus the shared atlas and palette.
pub struct Act {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    atlas: SpriteAtlas,
    #[serde(default)]
    pub palette: Palette,
}

impl Act {
    pub fn new(palette: Palette) -> Self {
        Self {
            actions: Vec::new(),
            atlas: SpriteAtlas::new(),
            palette,
        }
    }

    pub fn from_json(json: &str) -> FxResult<Self> {
        let act: Self = serde_json::from_str(json)?;
        act.validate()?;
        Ok(act)
    }

    pub fn to_json(&self) -> FxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    /// Animation type and facing direction of an action index.
    pub fn action_kind(index: usize) -> (usize, usize) {
        (index / DIRECTIONS, index % DIRECTIONS)
    }

    pub fn action(&self, index: usize) -> FxResult<&Action> {
        self.actions
            .get(index)
            .ok_or_else(|| FxError::selection(format!("action {index} is out of bounds")))
    }

    pub fn action_mut(&mut self, index: usize) -> FxResult<&mut Action> {
        self.actions
            .get_mut(index)
            .ok_or_else(|| FxError::selection(format!("action {index} is out of bounds")))
    }

    pub fn frame(&self, action: usize, frame: usize) -> FxResult<&Frame> {
        self.action(action)?.frames.get(frame).ok_or_else(|| {
            FxError::selection(format!("frame {frame} of action {action} is out of bounds"))
        })
    }

    pub fn frame_mut(&mut self, action: usize, frame: usize) -> FxResult<&mut Frame> {
        self.action_mut(action)?
            .frames
            .get_mut(frame)
            .ok_or_else(|| {
                FxError::selection(format!("frame {frame} of action {action} is out of bounds"))
            })
    }

    pub fn layer(&self, loc: LayerLoc) -> FxResult<&Layer> {
        self.frame(loc.action, loc.frame)?
            .layers
            .get(loc.layer)
            .ok_or_else(|| FxError::selection(format!("layer {loc:?} is out of bounds")))
    }

    pub fn layer_mut(&mut self, loc: LayerLoc) -> FxResult<&mut Layer> {
        self.frame_mut(loc.action, loc.frame)?
            .layers
            .get_mut(loc.layer)
            .ok_or_else(|| FxError::selection(format!("layer {loc:?} is out of bounds")))
    }

    pub fn image(&self, sprite: SpriteRef) -> FxResult<&Image> {
        self.atlas.get(sprite)
    }

    /// Mutable access to an atlas image; every layer bound to it sees the change.
    pub fn image_mut(&mut self, sprite: SpriteRef) -> FxResult<&mut Image> {
        self.atlas.get_mut(sprite)
    }

    /// Appends `image` to the end of its segment. No reference shifts are needed.
    pub fn insert_image(&mut self, image: Image) -> FxResult<SpriteRef> {
        image.validate()?;
        Ok(self.atlas.push(image))
    }

    /// Inserts `image` at `index` in its segment, shifting every layer reference of
    /// the same kind at or after `index` so layers keep drawing the same pixels.
    pub fn insert_image_at(&mut self, index: usize, image: Image) -> FxResult<SpriteRef> {
        image.validate()?;
        let sprite = self.atlas.insert(index, image)?;
        self.for_each_layer_mut(|_, layer| {
            if layer.sprite.kind == sprite.kind && layer.sprite.index >= index {
                layer.sprite.index += 1;
            }
        });
        Ok(sprite)
    }

    /// Removes an unreferenced image, shifting later references of the same kind down.
    pub fn remove_image(&mut self, sprite: SpriteRef) -> FxResult<Image> {
        if let Some(user) = self.references(sprite).first() {
            return Err(FxError::document(format!(
                "cannot remove {sprite}: still used by layer {user:?}"
            )));
        }
        let image = self.atlas.remove(sprite)?;
        self.for_each_layer_mut(|_, layer| {
            if layer.sprite.kind == sprite.kind && layer.sprite.index > sprite.index {
                layer.sprite.index -= 1;
            }
        });
        Ok(image)
    }

    /// Every layer currently bound to `sprite`.
    pub fn references(&self, sprite: SpriteRef) -> Vec<LayerLoc> {
        let mut out = Vec::new();
        self.for_each_layer(|loc, layer| {
            if layer.sprite == sprite {
                out.push(loc);
            }
        });
        out
    }

    pub fn for_each_layer(&self, mut visit: impl FnMut(LayerLoc, &Layer)) {
        for (a, action) in self.actions.iter().enumerate() {
            for (f, frame) in action.frames.iter().enumerate() {
                for (l, layer) in frame.layers.iter().enumerate() {
                    visit(
                        LayerLoc {
                            action: a,
                            frame: f,
                            layer: l,
                        },
                        layer,
                    );
                }
            }
        }
    }

    pub fn for_each_layer_mut(&mut self, mut visit: impl FnMut(LayerLoc, &mut Layer)) {
        for (a, action) in self.actions.iter_mut().enumerate() {
            for (f, frame) in action.frames.iter_mut().enumerate() {
                for (l, layer) in frame.layers.iter_mut().enumerate() {
                    visit(
                        LayerLoc {
                            action: a,
                            frame: f,
                            layer: l,
                        },
                        layer,
                    );
                }
            }
        }
    }

    pub fn for_each_frame(&self, mut visit: impl FnMut(usize, usize, &Frame)) {
        for (a, action) in self.actions.iter().enumerate() {
            for (f, frame) in action.frames.iter().enumerate() {
                visit(a, f, frame);
            }
        }
    }

    /// Checks that the palette is complete, every image is well formed and every
    /// layer resolves to an existing atlas image of its declared kind.
    pub fn validate(&self) -> FxResult<()> {
        self.palette.validate()?;
        for (sprite, image) in self.atlas.iter() {
            image.validate().map_err(|e| {
                FxError::document(format!("atlas image {sprite} is malformed: {e}"))
            })?;
        }
        let mut dangling = None;
        self.for_each_layer(|loc, layer| {
            if dangling.is_none() && !self.atlas.contains(layer.sprite) {
                dangling = Some((loc, layer.sprite));
            }
        });
        if let Some((loc, sprite)) = dangling {
            return Err(FxError::document(format!(
                "layer {loc:?} references missing image {sprite}"
            )));
        }
        Ok(())
    }

    /// Number of images in a segment, for callers that iterate by index.
    pub fn image_count(&self, kind: ImageKind) -> usize {
        self.atlas.len(kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
