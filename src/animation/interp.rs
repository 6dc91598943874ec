use crate::{
    animation::ease::Ease,
    document::model::{Act, Anchor, Frame, Layer},
    foundation::core::{Argb, Offset, Vec2},
    foundation::error::FxResult,
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Offset {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_i32(a: i32, b: i32, t: f64) -> i32 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as i32
        }
        Offset::new(lerp_i32(a.x, b.x, t), lerp_i32(a.y, b.y, t))
    }
}

impl Lerp for Argb {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Argb::lerp(*a, *b, t)
    }
}

/// Which layer traits take part in a blend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterpFlags {
    pub offset: bool,
    pub angle: bool,
    pub scale: bool,
    pub color: bool,
    pub mirror: bool,
}

impl InterpFlags {
    pub const ALL: Self = Self {
        offset: true,
        angle: true,
        scale: true,
        color: true,
        mirror: true,
    };
    pub const NONE: Self = Self {
        offset: false,
        angle: false,
        scale: false,
        color: false,
        mirror: false,
    };
}

impl Default for InterpFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Blends layer state between two keyframes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerBlend {
    pub ease: Ease,
    pub flags: InterpFlags,
}

impl LayerBlend {
    pub fn new(ease: Ease, flags: InterpFlags) -> Self {
        Self { ease, flags }
    }

    /// Blend at progress `t`. A layer missing on one side fades in or out
    /// through its tint alpha. `width` is the pixel width of the sprite drawn
    /// by `a`; it bounds the horizontal scale while a mirror flip is in flight.
    pub fn interpolate(
        &self,
        a: Option<&Layer>,
        b: Option<&Layer>,
        t: f64,
        width: u32,
    ) -> Option<Layer> {
        let te = self.ease.apply(t);
        match (a, b) {
            (None, None) => None,
            (None, Some(b)) => {
                let mut out = b.clone();
                out.color = b.color.scale_alpha(te);
                Some(out)
            }
            (Some(a), None) => {
                let mut out = a.clone();
                out.color = a.color.scale_alpha(1.0 - te);
                Some(out)
            }
            (Some(a), Some(b)) => Some(self.blend_both(a, b, te, width)),
        }
    }

    fn blend_both(&self, a: &Layer, b: &Layer, te: f64, width: u32) -> Layer {
        let f = self.flags;
        let mut out = a.clone();
        if te >= 0.5 {
            out.sprite = b.sprite;
        }
        if f.offset {
            out.offset = <Offset as Lerp>::lerp(&a.offset, &b.offset, te);
        }
        if f.angle {
            out.rotation = lerp_angle(a.rotation, b.rotation, te);
        }
        if f.scale {
            out.scale = <Vec2 as Lerp>::lerp(&a.scale, &b.scale, te);
        }
        if f.color {
            out.color = Argb::lerp(a.color, b.color, te);
        }
        if f.mirror && a.mirror != b.mirror {
            let sx_b = if f.scale { b.scale.x } else { a.scale.x };
            let signed_a = if a.mirror { -a.scale.x } else { a.scale.x };
            let signed_b = if b.mirror { -sx_b } else { sx_b };
            let mut s = <f64 as Lerp>::lerp(&signed_a, &signed_b, te);
            // A flip passes through zero width; keep at least one visible pixel column.
            let min = 1.0 / f64::from(width.max(1));
            if s.abs() < min {
                let toward = if te < 0.5 { signed_a } else { signed_b };
                s = min.copysign(toward);
            }
            out.mirror = s < 0.0;
            out.scale.x = s.abs();
        }
        out
    }
}

/// Rotation along the shorter arc from `a` to `b`, in degrees `0..360`.
pub fn lerp_angle(a: i32, b: i32, t: f64) -> i32 {
    let cw = (b - a + 360).rem_euclid(360);
    let ccw = (a - b + 360).rem_euclid(360);
    let delta = if cw <= ccw {
        f64::from(cw)
    } else {
        -f64::from(ccw)
    };
    ((f64::from(a) + delta * t).round() as i32).rem_euclid(360)
}

/// Correspondence between the layers of two keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerPair {
    pub a: Option<usize>,
    pub b: Option<usize>,
}

/// Matches layers by identical sprite at the same index first, then by a sprite
/// that occurs exactly once in both frames; everything else appears or disappears.
pub fn match_layers(a: &[Layer], b: &[Layer]) -> Vec<LayerPair> {
    let mut b_of_a: Vec<Option<usize>> = vec![None; a.len()];
    let mut b_taken = vec![false; b.len()];

    for i in 0..a.len().min(b.len()) {
        if a[i].sprite == b[i].sprite {
            b_of_a[i] = Some(i);
            b_taken[i] = true;
        }
    }

    for i in 0..a.len() {
        if b_of_a[i].is_some() {
            continue;
        }
        let sprite = a[i].sprite;
        if a.iter().filter(|l| l.sprite == sprite).count() != 1 {
            continue;
        }
        let mut hits = b.iter().enumerate().filter(|(_, l)| l.sprite == sprite);
        if let (Some((j, _)), None) = (hits.next(), hits.next())
            && !b_taken[j]
        {
            b_of_a[i] = Some(j);
            b_taken[j] = true;
        }
    }

    let mut pairs: Vec<LayerPair> = b_of_a
        .iter()
        .enumerate()
        .map(|(i, &j)| LayerPair { a: Some(i), b: j })
        .collect();
    for (j, taken) in b_taken.iter().enumerate() {
        if !taken {
            let at = j.min(pairs.len());
            pairs.insert(at, LayerPair { a: None, b: Some(j) });
        }
    }
    pairs
}

/// Synthesizes the in-between frame at progress `t` from keyframes `a` and `b`.
pub fn interpolate_frame(
    act: &Act,
    a: &Frame,
    b: &Frame,
    t: f64,
    blend: &LayerBlend,
) -> FxResult<Frame> {
    let mut layers = Vec::new();
    for pair in match_layers(&a.layers, &b.layers) {
        let la = pair.a.map(|i| &a.layers[i]);
        let lb = pair.b.map(|j| &b.layers[j]);
        let width = match la.or(lb) {
            Some(l) => act.image(l.sprite)?.width,
            None => 1,
        };
        if let Some(layer) = blend.interpolate(la, lb, t, width) {
            layers.push(layer);
        }
    }

    let te = blend.ease.apply(t);
    let anchors = if a.anchors.len() == b.anchors.len() {
        a.anchors
            .iter()
            .zip(&b.anchors)
            .map(|(x, y)| Anchor {
                offset: <Offset as Lerp>::lerp(&x.offset, &y.offset, te),
            })
            .collect()
    } else {
        a.anchors.clone()
    };

    Ok(Frame {
        layers,
        anchors,
        sound: None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
