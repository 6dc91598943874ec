use std::collections::HashMap;

use crate::document::atlas::SpriteRef;

/// Derived atlas images of one transaction, keyed by source image and variant.
///
/// Two layers that draw the same source with the same variant key share one
/// derived image. The cache never outlives the transaction that filled it.
#[derive(Clone, Debug, Default)]
pub struct SpriteTransformCache {
    entries: HashMap<(SpriteRef, u64), SpriteRef>,
    hits: usize,
    misses: usize,
}

impl SpriteTransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a derived image, counting the outcome.
    pub fn lookup(&mut self, source: SpriteRef, key: u64) -> Option<SpriteRef> {
        let hit = self.entries.get(&(source, key)).copied();
        if hit.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        hit
    }

    pub fn insert(&mut self, source: SpriteRef, key: u64, derived: SpriteRef) {
        self.entries.insert((source, key), derived);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since the last clear.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
