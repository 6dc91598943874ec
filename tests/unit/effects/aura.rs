use super::*;
use crate::document::{
    atlas::{ImageKind, Palette},
    model::{Act, Action, Frame, Layer},
};
use crate::effects::{config::EffectConfig, pipeline::EffectPipeline};

fn dot_act(frames: usize) -> Act {
    let mut act = Act::new(Palette::grayscale());
    let sprite = act
        .insert_image(Image::from_indexed(1, 1, vec![200]).unwrap())
        .unwrap();
    act.actions.push(Action {
        frames: vec![Frame::with_layers(vec![Layer::new(sprite).with_offset(3, -2)]); frames],
    });
    act
}

#[test]
fn pulse_follows_a_cosine() {
    let mut fx = AuraEffect::new();
    fx.period = 4;
    fx.min_alpha = 0;
    fx.max_alpha = 200;
    let alphas: Vec<u8> = (0..5).map(|s| fx.pulse(s)).collect();
    assert_eq!(alphas, vec![0, 100, 200, 100, 0]);
}

#[test]
fn glow_layer_goes_behind_each_selected_layer() {
    let cfg = EffectConfig::new("aura")
        .with_param("radius", 2)
        .with_param("period", 4)
        .with_param("min_alpha", 0)
        .with_param("max_alpha", 200);
    let out = EffectPipeline::new(Box::new(AuraEffect::new()))
        .preview(&dot_act(3), &cfg)
        .unwrap();
    let frames = &out.actions[0].frames;
    for (f, want) in [(0usize, 0u8), (1, 100), (2, 200)] {
        let layers = &frames[f].layers;
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].sprite.kind, ImageKind::Rgba);
        assert_eq!(layers[0].color.a, want);
        assert_eq!(layers[0].offset, layers[1].offset);
        assert_eq!(layers[1].sprite.kind, ImageKind::Indexed);
    }
    // One glow image serves every frame.
    assert_eq!(out.image_count(ImageKind::Rgba), 1);
}

#[test]
fn glow_fades_with_distance() {
    let cfg = EffectConfig::new("aura")
        .with_param("radius", 2)
        .with_param("red", 10)
        .with_param("green", 20)
        .with_param("blue", 30);
    let out = EffectPipeline::new(Box::new(AuraEffect::new()))
        .preview(&dot_act(1), &cfg)
        .unwrap();
    let glow = out.image(out.actions[0].frames[0].layers[0].sprite).unwrap();
    assert_eq!((glow.width, glow.height), (5, 5));
    let pal = &out.palette;
    assert_eq!(glow.color_at(2, 2, pal), Argb::new(255, 10, 20, 30));
    assert_eq!(glow.alpha_at(3, 2, pal), 170);
    assert_eq!(glow.alpha_at(4, 2, pal), 85);
    assert_eq!(glow.alpha_at(0, 0, pal), 0);
}
