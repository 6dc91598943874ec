use crate::{
    document::model::{Act, Action, Frame, Layer},
    foundation::core::{Affine, Point, Rect, Vec2},
    foundation::error::FxResult,
};

/// Image-pixel to screen mapping of a layer drawing a `width` x `height` image.
///
/// The image is centered on the layer offset; rotation is clockwise in the
/// y-down screen space and the mirror flag negates the horizontal scale.
pub fn layer_affine(layer: &Layer, width: u32, height: u32) -> Affine {
    let sx = if layer.mirror {
        -layer.scale.x
    } else {
        layer.scale.x
    };
    let t_offset = Affine::translate(layer.offset.to_vec2());
    let t_rotate = Affine::rotate(f64::from(layer.rotation).to_radians());
    let t_scale = Affine::scale_non_uniform(sx, layer.scale.y);
    let t_center = Affine::translate(Vec2::new(
        -f64::from(width) / 2.0,
        -f64::from(height) / 2.0,
    ));
    t_offset * t_rotate * t_scale * t_center
}

/// Linear part of [`layer_affine`], for mapping local displacements.
pub fn layer_linear(layer: &Layer) -> Affine {
    let m = layer_affine(layer, 0, 0).as_coeffs();
    Affine::new([m[0], m[1], m[2], m[3], 0.0, 0.0])
}

/// Screen-space bounding box of one layer.
pub fn layer_bounds(act: &Act, layer: &Layer) -> FxResult<Rect> {
    let image = act.image(layer.sprite)?;
    let rect = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
    Ok(layer_affine(layer, image.width, image.height).transform_rect_bbox(rect))
}

/// Union of the layer bounds of a frame; `None` for a frame without layers.
pub fn frame_bounds(act: &Act, frame: &Frame) -> FxResult<Option<Rect>> {
    let mut acc: Option<Rect> = None;
    for layer in &frame.layers {
        let r = layer_bounds(act, layer)?;
        acc = Some(acc.map_or(r, |a| a.union(r)));
    }
    Ok(acc)
}

/// Bounding box accumulated over every frame of an action.
pub fn action_bounds(act: &Act, action: &Action) -> FxResult<Option<Rect>> {
    let mut acc: Option<Rect> = None;
    for frame in &action.frames {
        if let Some(r) = frame_bounds(act, frame)? {
            acc = Some(acc.map_or(r, |a| a.union(r)));
        }
    }
    Ok(acc)
}

/// Point at `(fx, fy)` fractions of `rect`.
pub fn point_in(rect: Rect, fx: f64, fy: f64) -> Point {
    Point::new(
        rect.x0 + rect.width() * fx,
        rect.y0 + rect.height() * fy,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/bounds.rs"]
mod tests;
