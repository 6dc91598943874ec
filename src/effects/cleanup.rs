use std::collections::BTreeSet;

use crate::{
    document::{atlas::SpriteRef, model::Act},
    effects::{config::CleanupOptions, context::Session},
    foundation::{core::Point, error::FxResult},
    geometry::bounds::layer_linear,
    raster::trim::{TrimOutcome, trim_image},
};

/// What the post-effect pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub trimmed: usize,
    pub emptied: usize,
    pub dropped_layers: usize,
    pub removed_images: usize,
}

/// Trims every image created in `session`, re-anchors the layers that draw
/// them, then drops emptied stubs from the processed actions.
#[tracing::instrument(skip(act, session))]
pub fn run_cleanup(
    act: &mut Act,
    session: &Session,
    opts: &CleanupOptions,
) -> FxResult<CleanupReport> {
    let mut report = CleanupReport::default();
    let palette = act.palette.clone();

    for &sprite in &session.inserted {
        let image = act.image_mut(sprite)?;
        let (old_w, old_h) = (image.width, image.height);
        match trim_image(image, &palette, opts.alpha_tolerance, opts.even_trim)? {
            TrimOutcome::Unchanged => {}
            TrimOutcome::Emptied => report.emptied += 1,
            TrimOutcome::Cropped(m) => {
                report.trimmed += 1;
                let (new_w, new_h) = (old_w - m.left - m.right, old_h - m.top - m.bottom);
                // Shift of the image center, in image pixels.
                let local = Point::new(
                    f64::from(m.left) + f64::from(new_w) / 2.0 - f64::from(old_w) / 2.0,
                    f64::from(m.top) + f64::from(new_h) / 2.0 - f64::from(old_h) / 2.0,
                );
                reanchor(act, sprite, local);
            }
        }
    }

    if opts.remove_stubs {
        let stubs: BTreeSet<SpriteRef> = session
            .inserted
            .iter()
            .copied()
            .filter(|&s| act.image(s).is_ok_and(|img| img.is_stub(&palette)))
            .collect();
        if !stubs.is_empty() {
            for &a in &session.actions {
                for frame in &mut act.action_mut(a)?.frames {
                    let before = frame.layers.len();
                    frame.layers.retain(|l| !stubs.contains(&l.sprite));
                    report.dropped_layers += before - frame.layers.len();
                }
            }
            // Highest index first so pending refs stay valid.
            for &stub in stubs.iter().rev() {
                if act.references(stub).is_empty() {
                    act.remove_image(stub)?;
                    report.removed_images += 1;
                }
            }
        }
    }

    tracing::debug!(
        trimmed = report.trimmed,
        emptied = report.emptied,
        dropped_layers = report.dropped_layers,
        removed_images = report.removed_images,
        "cleanup done"
    );
    Ok(report)
}

/// Moves every layer drawing `sprite` so its pixels stay where they were on
/// screen after the image center moved by `local`.
fn reanchor(act: &mut Act, sprite: SpriteRef, local: Point) {
    act.for_each_layer_mut(|_, layer| {
        if layer.sprite != sprite {
            return;
        }
        let d = layer_linear(layer) * local;
        layer.offset.x += d.x.round() as i32;
        layer.offset.y += d.y.round() as i32;
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/cleanup.rs"]
mod tests;
