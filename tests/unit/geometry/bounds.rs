use super::*;
use crate::document::{
    atlas::{Image, Palette},
    model::Frame,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn act_with_image(w: u32, h: u32) -> (Act, crate::document::atlas::SpriteRef) {
    let mut act = Act::new(Palette::grayscale());
    let sprite = act.insert_image(Image::new_indexed(w, h)).unwrap();
    (act, sprite)
}

#[test]
fn unrotated_layer_is_centered_on_offset() {
    let (act, sprite) = act_with_image(4, 2);
    let layer = Layer::new(sprite).with_offset(10, 20);
    let r = layer_bounds(&act, &layer).unwrap();
    assert!(approx(r.x0, 8.0) && approx(r.x1, 12.0));
    assert!(approx(r.y0, 19.0) && approx(r.y1, 21.0));
}

#[test]
fn quarter_turn_swaps_extents() {
    let (act, sprite) = act_with_image(4, 2);
    let layer = Layer::new(sprite).with_rotation(90);
    let r = layer_bounds(&act, &layer).unwrap();
    assert!(approx(r.width(), 2.0));
    assert!(approx(r.height(), 4.0));
}

#[test]
fn mirror_flips_local_x() {
    let (_, sprite) = act_with_image(4, 2);
    let mut layer = Layer::new(sprite);
    layer.mirror = true;
    let p = layer_affine(&layer, 4, 2) * Point::new(0.0, 1.0);
    assert!(approx(p.x, 2.0));
    assert!(approx(p.y, 0.0));
}

#[test]
fn action_bounds_accumulate_over_frames() {
    let (act, sprite) = act_with_image(2, 2);
    let action = Action {
        frames: vec![
            Frame::with_layers(vec![Layer::new(sprite)]),
            Frame::default(),
            Frame::with_layers(vec![Layer::new(sprite).with_offset(10, 0)]),
        ],
    };
    let r = action_bounds(&act, &action).unwrap().unwrap();
    assert!(approx(r.x0, -1.0) && approx(r.x1, 11.0));
    assert!(approx(r.y0, -1.0) && approx(r.y1, 1.0));
    assert!(frame_bounds(&act, &action.frames[1]).unwrap().is_none());
}

#[test]
fn clockwise_rotation_in_screen_space() {
    let (_, sprite) = act_with_image(0, 0);
    let layer = Layer::new(sprite).with_rotation(90);
    let v = layer_linear(&layer) * Point::new(1.0, 0.0);
    // +x rotates onto +y (downwards on screen).
    assert!(approx(v.x, 0.0));
    assert!(approx(v.y, 1.0));
}
