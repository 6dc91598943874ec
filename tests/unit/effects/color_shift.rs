use super::*;
use crate::document::{
    atlas::{ImageKind, Palette},
    model::{Act, Action, Frame, Layer},
};
use crate::effects::{config::EffectConfig, pipeline::EffectPipeline};

#[test]
fn hue_rotation_moves_primaries() {
    let red = Argb::opaque(255, 0, 0);
    assert_eq!(shift(red, 120.0, 0.0), Argb::opaque(0, 255, 0));
    assert_eq!(shift(red, -120.0, 0.0), Argb::opaque(0, 0, 255));
    assert_eq!(shift(red, 360.0, 0.0), red);
}

#[test]
fn desaturation_yields_gray_and_keeps_alpha() {
    let c = Argb::new(40, 200, 100, 50);
    let g = shift(c, 0.0, -1.0);
    assert_eq!(g.a, 40);
    assert_eq!((g.r, g.g, g.b), (200, 200, 200));
}

#[test]
fn zero_shift_is_identity() {
    for c in [
        Argb::opaque(12, 34, 56),
        Argb::opaque(255, 255, 255),
        Argb::opaque(0, 0, 0),
        Argb::new(9, 250, 3, 128),
    ] {
        assert_eq!(shift(c, 0.0, 0.0), c);
    }
}

#[test]
fn layers_on_one_image_and_step_share_the_result() {
    let mut palette = Palette::grayscale();
    palette.colors[5] = Argb::opaque(255, 0, 0);
    let mut act = Act::new(palette);
    let sprite = act
        .insert_image(Image::from_indexed(2, 1, vec![5, 5]).unwrap())
        .unwrap();
    act.actions.push(Action {
        frames: vec![
            Frame::with_layers(vec![Layer::new(sprite)]),
            Frame::with_layers(vec![Layer::new(sprite), Layer::new(sprite).with_offset(4, 0)]),
        ],
    });
    let cfg = EffectConfig::new("color_shift").with_param("hue", 120);
    let out = EffectPipeline::new(Box::new(ColorShiftEffect::new()))
        .preview(&act, &cfg)
        .unwrap();
    // Step 0 and step 1: two derived direct-color images.
    assert_eq!(out.image_count(ImageKind::Rgba), 2);
    let last = &out.actions[0].frames[1].layers;
    assert_eq!(last[0].sprite, last[1].sprite);
    let img = out.image(last[0].sprite).unwrap();
    assert_eq!(img.color_at(0, 0, &out.palette), Argb::opaque(0, 255, 0));
}
