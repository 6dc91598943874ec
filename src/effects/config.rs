use std::ops::Range;

use crate::{
    document::model::Act,
    foundation::error::{FxError, FxResult},
};

/// Half-open range of layer indices, `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerRange {
    pub start: usize,
    pub end: usize,
}

/// Which part of the document an effect is applied to.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Action indices; empty selects every action.
    pub actions: Vec<usize>,
    /// Layer indices within each frame; `None` selects every layer.
    pub layers: Option<LayerRange>,
    /// Cycle the existing frames when the animation range runs past the end.
    pub loop_frames: bool,
    /// Append one empty frame after processing.
    pub append_empty_frame: bool,
    pub anim_start: usize,
    /// Frames in the animation range; `None` runs to the end of the action.
    pub anim_length: Option<usize>,
}

impl Selection {
    /// Checks the selection against `act` without touching it.
    pub fn validate(&self, act: &Act) -> FxResult<()> {
        if let Some(r) = self.layers
            && r.start >= r.end
        {
            return Err(FxError::selection(format!(
                "layer range {}..{} is empty",
                r.start, r.end
            )));
        }
        if self.anim_length == Some(0) {
            return Err(FxError::selection("animation length must be at least 1"));
        }
        for &a in &self.actions {
            act.action(a)?;
        }
        if act.actions.is_empty() {
            return Err(FxError::selection("document has no actions"));
        }
        for a in self.action_indices(act) {
            let count = act.action(a)?.frames.len();
            if count == 0 {
                continue;
            }
            let reachable = match self.required_frames() {
                Some(needed) if self.loop_frames => count.max(needed),
                _ => count,
            };
            if self.anim_start >= reachable {
                return Err(FxError::selection(format!(
                    "animation start {} is beyond the last frame of action {a} ({reachable} frames)",
                    self.anim_start
                )));
            }
        }
        Ok(())
    }

    /// Selected action indices in ascending order, duplicates removed.
    pub fn action_indices(&self, act: &Act) -> Vec<usize> {
        if self.actions.is_empty() {
            return (0..act.actions.len()).collect();
        }
        let mut out = self.actions.clone();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn layer_selected(&self, layer: usize) -> bool {
        self.layers
            .is_none_or(|r| (r.start..r.end).contains(&layer))
    }

    /// Number of frames the animation range needs, if bounded.
    pub fn required_frames(&self) -> Option<usize> {
        self.anim_length.map(|len| self.anim_start + len)
    }

    /// Animation range of an action holding `frame_count` frames.
    pub fn anim_range(&self, frame_count: usize) -> FxResult<AnimRange> {
        if self.anim_start >= frame_count {
            return Err(FxError::selection(format!(
                "animation start {} is beyond the last frame ({frame_count} frames)",
                self.anim_start
            )));
        }
        let end = match self.anim_length {
            Some(len) => (self.anim_start + len).min(frame_count),
            None => frame_count,
        };
        Ok(AnimRange {
            start: self.anim_start,
            len: end - self.anim_start,
        })
    }
}

/// Frames `start..start + len` of one action, processed as animation steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimRange {
    pub start: usize,
    pub len: usize,
}

impl AnimRange {
    pub fn frames(self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Step index of `frame`, `0` at the range start.
    pub fn step_of(self, frame: usize) -> usize {
        frame.saturating_sub(self.start)
    }

    /// Denominator of the normalized progress: the last frame reaches `1.0`.
    pub fn total_steps(self) -> usize {
        self.len.saturating_sub(1).max(1)
    }

    pub fn progress(self, step: usize) -> f64 {
        (step as f64 / self.total_steps() as f64).clamp(0.0, 1.0)
    }
}

/// Post-effect trim and garbage collection settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Pixels with alpha at or below this value count as transparent.
    pub alpha_tolerance: u8,
    /// Keep the total trim of each axis even.
    pub even_trim: bool,
    /// Delete 1x1 transparent images left behind by erosion.
    pub remove_stubs: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            alpha_tolerance: 0,
            even_trim: true,
            remove_stubs: true,
        }
    }
}

/// One effect invocation, as read from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectConfig {
    pub effect: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    /// Overrides the effect's default selection.
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub cleanup: CleanupOptions,
}

impl EffectConfig {
    pub fn new(effect: &str) -> Self {
        Self {
            effect: effect.to_string(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn from_json(json: &str) -> FxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/config.rs"]
mod tests;
