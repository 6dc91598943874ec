use crate::foundation::{
    core::Argb,
    error::{FxError, FxResult},
};

/// Which atlas segment an image lives in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// One palette index per pixel; index 0 is transparent.
    Indexed,
    /// One straight ARGB color per pixel.
    Rgba,
}

/// Stable handle to one atlas image: segment plus position within the segment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SpriteRef {
    pub kind: ImageKind,
    pub index: usize,
}

impl SpriteRef {
    pub const fn indexed(index: usize) -> Self {
        Self {
            kind: ImageKind::Indexed,
            index,
        }
    }

    pub const fn rgba(index: usize) -> Self {
        Self {
            kind: ImageKind::Rgba,
            index,
        }
    }
}

impl std::fmt::Display for SpriteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ImageKind::Indexed => write!(f, "indexed#{}", self.index),
            ImageKind::Rgba => write!(f, "rgba#{}", self.index),
        }
    }
}

/// 256-entry palette shared by all indexed images of an Act.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub colors: Vec<Argb>,
}

impl Palette {
    pub const LEN: usize = 256;

    /// Grayscale ramp with a transparent entry 0.
    pub fn grayscale() -> Self {
        let colors = (0..Self::LEN)
            .map(|i| {
                if i == 0 {
                    Argb::TRANSPARENT
                } else {
                    let v = i as u8;
                    Argb::opaque(v, v, v)
                }
            })
            .collect();
        Self { colors }
    }

    pub fn color(&self, index: u8) -> Argb {
        if index == 0 {
            return Argb::TRANSPARENT;
        }
        self.colors
            .get(usize::from(index))
            .copied()
            .unwrap_or(Argb::TRANSPARENT)
    }

    /// Closest non-transparent entry to `color` by RGB distance (never 0).
    pub fn nearest(&self, color: Argb) -> u8 {
        let mut best = 1u8;
        let mut best_d = u32::MAX;
        for (i, c) in self.colors.iter().enumerate().skip(1).take(Self::LEN - 1) {
            let d = c.rgb_distance_sq(color);
            if d < best_d {
                best_d = d;
                best = i as u8;
            }
        }
        best
    }

    pub fn validate(&self) -> FxResult<()> {
        if self.colors.len() != Self::LEN {
            return Err(FxError::document(format!(
                "palette must have {} entries, got {}",
                Self::LEN,
                self.colors.len()
            )));
        }
        Ok(())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// Pixel storage of an atlas image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Pixels {
    Indexed(Vec<u8>),
    Rgba(Vec<Argb>),
}

/// Stored value of a single pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Texel {
    Index(u8),
    Color(Argb),
}

/// One atlas image in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Pixels,
}

impl Image {
    pub fn new_indexed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Pixels::Indexed(vec![0; (width as usize) * (height as usize)]),
        }
    }

    pub fn new_rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Pixels::Rgba(vec![Argb::TRANSPARENT; (width as usize) * (height as usize)]),
        }
    }

    /// The 1x1 fully transparent sentinel that emptied images collapse to.
    pub fn empty_like(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Indexed => Self::new_indexed(1, 1),
            ImageKind::Rgba => Self::new_rgba(1, 1),
        }
    }

    pub fn from_indexed(width: u32, height: u32, data: Vec<u8>) -> FxResult<Self> {
        let img = Self {
            width,
            height,
            pixels: Pixels::Indexed(data),
        };
        img.validate()?;
        Ok(img)
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<Argb>) -> FxResult<Self> {
        let img = Self {
            width,
            height,
            pixels: Pixels::Rgba(data),
        };
        img.validate()?;
        Ok(img)
    }

    pub fn kind(&self) -> ImageKind {
        match self.pixels {
            Pixels::Indexed(_) => ImageKind::Indexed,
            Pixels::Rgba(_) => ImageKind::Rgba,
        }
    }

    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> FxResult<()> {
        let got = match &self.pixels {
            Pixels::Indexed(p) => p.len(),
            Pixels::Rgba(p) => p.len(),
        };
        if got != self.len() {
            return Err(FxError::document(format!(
                "image {}x{} expects {} pixels, got {got}",
                self.width,
                self.height,
                self.len()
            )));
        }
        Ok(())
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Color of a pixel, resolving indexed pixels through `palette`.
    pub fn color_at(&self, x: u32, y: u32, palette: &Palette) -> Argb {
        let i = self.idx(x, y);
        match &self.pixels {
            Pixels::Indexed(p) => palette.color(p[i]),
            Pixels::Rgba(p) => p[i],
        }
    }

    /// Alpha of a pixel as drawn (indexed index 0 is always transparent).
    pub fn alpha_at(&self, x: u32, y: u32, palette: &Palette) -> u8 {
        self.color_at(x, y, palette).a
    }

    pub fn is_opaque_at(&self, x: u32, y: u32, palette: &Palette, tolerance: u8) -> bool {
        self.alpha_at(x, y, palette) > tolerance
    }

    /// Raw stored value of a pixel.
    pub fn texel(&self, x: u32, y: u32) -> Texel {
        let i = self.idx(x, y);
        match &self.pixels {
            Pixels::Indexed(p) => Texel::Index(p[i]),
            Pixels::Rgba(p) => Texel::Color(p[i]),
        }
    }

    /// Stores `value`, converting it to this image's pixel kind when needed
    /// (colors map to the nearest palette entry, indices resolve through it).
    pub fn set_texel(&mut self, x: u32, y: u32, value: Texel, palette: &Palette) {
        let i = self.idx(x, y);
        match (&mut self.pixels, value) {
            (Pixels::Indexed(p), Texel::Index(v)) => p[i] = v,
            (Pixels::Indexed(p), Texel::Color(c)) => {
                p[i] = if c.is_transparent() {
                    0
                } else {
                    palette.nearest(c)
                }
            }
            (Pixels::Rgba(p), Texel::Color(c)) => p[i] = c,
            (Pixels::Rgba(p), Texel::Index(v)) => p[i] = palette.color(v),
        }
    }

    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        let i = self.idx(x, y);
        match &mut self.pixels {
            Pixels::Indexed(p) => p[i] = 0,
            Pixels::Rgba(p) => p[i] = Argb::TRANSPARENT,
        }
    }

    /// Copies pixel `(sx, sy)` over `(dx, dy)` within the same image.
    pub fn copy_pixel(&mut self, sx: u32, sy: u32, dx: u32, dy: u32) {
        let s = self.idx(sx, sy);
        let d = self.idx(dx, dy);
        match &mut self.pixels {
            Pixels::Indexed(p) => p[d] = p[s],
            Pixels::Rgba(p) => p[d] = p[s],
        }
    }

    /// Whether every pixel is transparent under `tolerance`.
    pub fn is_blank(&self, palette: &Palette, tolerance: u8) -> bool {
        (0..self.height).all(|y| (0..self.width).all(|x| !self.is_opaque_at(x, y, palette, tolerance)))
    }

    /// The 1x1 transparent sentinel produced by emptied images.
    pub fn is_stub(&self, palette: &Palette) -> bool {
        self.width == 1 && self.height == 1 && self.is_blank(palette, 0)
    }

    /// Direct-color copy of this image (indexed pixels resolved through `palette`).
    pub fn to_rgba(&self, palette: &Palette) -> Self {
        match &self.pixels {
            Pixels::Rgba(_) => self.clone(),
            Pixels::Indexed(p) => Self {
                width: self.width,
                height: self.height,
                pixels: Pixels::Rgba(p.iter().map(|&i| palette.color(i)).collect()),
            },
        }
    }

    /// Sub-image `[x, x+w) x [y, y+h)`; the rectangle must lie inside the image.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> FxResult<Self> {
        if x.saturating_add(w) > self.width || y.saturating_add(h) > self.height {
            return Err(FxError::processing(format!(
                "crop {w}x{h}+{x}+{y} exceeds image {}x{}",
                self.width, self.height
            )));
        }
        let rows = y as usize..(y + h) as usize;
        let cols = |row: usize| {
            let start = row * self.width as usize + x as usize;
            start..start + w as usize
        };
        let pixels = match &self.pixels {
            Pixels::Indexed(p) => {
                Pixels::Indexed(rows.flat_map(|r| p[cols(r)].iter().copied()).collect())
            }
            Pixels::Rgba(p) => {
                Pixels::Rgba(rows.flat_map(|r| p[cols(r)].iter().copied()).collect())
            }
        };
        Ok(Self {
            width: w,
            height: h,
            pixels,
        })
    }

    /// Copy grown by `pad` transparent pixels on every side.
    pub fn padded(&self, pad: u32) -> Self {
        fn grow<T: Copy>(src: &[T], w: u32, h: u32, pad: u32, fill: T) -> Vec<T> {
            let out_w = (w + 2 * pad) as usize;
            let mut out = vec![fill; out_w * (h + 2 * pad) as usize];
            for (y, row) in src.chunks_exact(w.max(1) as usize).enumerate() {
                let start = (y + pad as usize) * out_w + pad as usize;
                out[start..start + row.len()].copy_from_slice(row);
            }
            out
        }

        let pixels = match &self.pixels {
            Pixels::Indexed(p) => Pixels::Indexed(grow(p, self.width, self.height, pad, 0)),
            Pixels::Rgba(p) => {
                Pixels::Rgba(grow(p, self.width, self.height, pad, Argb::TRANSPARENT))
            }
        };
        Self {
            width: self.width + 2 * pad,
            height: self.height + 2 * pad,
            pixels,
        }
    }
}

/// Arena of atlas images split into the indexed and direct-color segments.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpriteAtlas {
    indexed: Vec<Image>,
    rgba: Vec<Image>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, kind: ImageKind) -> usize {
        self.segment(kind).len()
    }

    pub fn total_len(&self) -> usize {
        self.indexed.len() + self.rgba.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Position of `sprite` in the flat atlas (indexed segment first).
    pub fn absolute_index(&self, sprite: SpriteRef) -> usize {
        match sprite.kind {
            ImageKind::Indexed => sprite.index,
            ImageKind::Rgba => self.indexed.len() + sprite.index,
        }
    }

    pub fn contains(&self, sprite: SpriteRef) -> bool {
        sprite.index < self.len(sprite.kind)
    }

    pub fn get(&self, sprite: SpriteRef) -> FxResult<&Image> {
        self.segment(sprite.kind)
            .get(sprite.index)
            .ok_or_else(|| FxError::document(format!("unknown atlas image {sprite}")))
    }

    pub fn get_mut(&mut self, sprite: SpriteRef) -> FxResult<&mut Image> {
        self.segment_mut(sprite.kind)
            .get_mut(sprite.index)
            .ok_or_else(|| FxError::document(format!("unknown atlas image {sprite}")))
    }

    pub(crate) fn push(&mut self, image: Image) -> SpriteRef {
        let kind = image.kind();
        let seg = self.segment_mut(kind);
        seg.push(image);
        SpriteRef {
            kind,
            index: seg.len() - 1,
        }
    }

    pub(crate) fn insert(&mut self, index: usize, image: Image) -> FxResult<SpriteRef> {
        let kind = image.kind();
        let seg = self.segment_mut(kind);
        if index > seg.len() {
            return Err(FxError::document(format!(
                "atlas insert position {index} beyond {kind:?} segment of {}",
                seg.len()
            )));
        }
        seg.insert(index, image);
        Ok(SpriteRef { kind, index })
    }

    pub(crate) fn remove(&mut self, sprite: SpriteRef) -> FxResult<Image> {
        let seg = self.segment_mut(sprite.kind);
        if sprite.index >= seg.len() {
            return Err(FxError::document(format!("unknown atlas image {sprite}")));
        }
        Ok(seg.remove(sprite.index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteRef, &Image)> {
        let indexed = self
            .indexed
            .iter()
            .enumerate()
            .map(|(i, img)| (SpriteRef::indexed(i), img));
        let rgba = self
            .rgba
            .iter()
            .enumerate()
            .map(|(i, img)| (SpriteRef::rgba(i), img));
        indexed.chain(rgba)
    }

    fn segment(&self, kind: ImageKind) -> &Vec<Image> {
        match kind {
            ImageKind::Indexed => &self.indexed,
            ImageKind::Rgba => &self.rgba,
        }
    }

    fn segment_mut(&mut self, kind: ImageKind) -> &mut Vec<Image> {
        match kind {
            ImageKind::Indexed => &mut self.indexed,
            ImageKind::Rgba => &mut self.rgba,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/atlas.rs"]
mod tests;
