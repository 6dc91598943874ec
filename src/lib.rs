//! actfx applies procedural animation effects to sprite-sheet Act documents.
//!
//! An [`Act`] holds actions (8 facing directions per animation type), each a
//! sequence of frames whose layers draw images from a shared atlas. Effects
//! synthesize new frames, layers and atlas images from that data: keyframe
//! interpolation, Voronoi and column erosion, motion trails, outlines, auras
//! and color shifts.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: parameters are checked against the effect's schema
//!    before the document is touched.
//! 2. **Transaction**: [`Backup::begin`] opens the undo boundary and a fresh
//!    session (sprite transform cache, touched images) is created.
//! 3. **Process**: per selected action, the effect precomputes its seeded
//!    state, then mutates frames and derives images through the cache.
//! 4. **Cleanup**: derived images are trimmed, dependent layers re-anchored
//!    and emptied stubs removed; the transaction is committed, or aborted on
//!    any error.
//!
//! [`EffectPipeline::preview`] runs the same steps on a copy of the document.
#![forbid(unsafe_code)]

pub mod animation;
pub mod document;
pub mod effects;
pub mod foundation;
pub mod geometry;
pub mod raster;

pub use animation::ease::Ease;
pub use animation::interp::{InterpFlags, LayerBlend, interpolate_frame, lerp_angle};
pub use document::atlas::{Image, ImageKind, Palette, Pixels, SpriteAtlas, SpriteRef, Texel};
pub use document::backup::{Backup, SnapshotBackup};
pub use document::model::{Act, Action, Anchor, DIRECTIONS, Frame, Layer, LayerLoc};
pub use effects::cache::SpriteTransformCache;
pub use effects::cleanup::CleanupReport;
pub use effects::config::{AnimRange, CleanupOptions, EffectConfig, LayerRange, Selection};
pub use effects::context::{EffectContext, Session};
pub use effects::params::{ParamDef, ParamKind, ParamValues};
pub use effects::pipeline::{ApplyStats, EffectPipeline};
pub use effects::registry::EffectRegistry;
pub use effects::traits::{AnimationEffect, EffectProperties, ImageJob, ImageProcessor};
pub use foundation::core::{Argb, Offset};
pub use foundation::error::{FxError, FxResult};
