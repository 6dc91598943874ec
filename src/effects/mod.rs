pub mod aura;
pub mod cache;
pub mod cleanup;
pub mod color_shift;
pub mod config;
pub mod context;
pub mod crystal;
pub mod interpolate;
pub mod outline;
pub mod params;
pub mod pipeline;
pub mod registry;
pub mod stripe;
pub mod trail;
pub mod traits;

use crate::{document::atlas::SpriteRef, foundation::math::Fnv1a64};

/// Per-image RNG seed: the same effect seed yields unrelated but stable
/// streams for different source images.
pub(crate) fn sprite_seed(seed: u64, sprite: SpriteRef) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(seed);
    h.write_u8(sprite.kind as u8);
    h.write_u64(sprite.index as u64);
    h.finish()
}
