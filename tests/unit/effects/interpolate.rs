use super::*;
use crate::document::{
    atlas::{Image, Palette},
    model::{Action, Frame, Layer},
};
use crate::effects::{config::EffectConfig, pipeline::EffectPipeline};
use crate::foundation::core::{Argb, Offset};

fn keyframes(n_between: usize) -> Act {
    let mut act = Act::new(Palette::grayscale());
    let sprite = act
        .insert_image(Image::from_indexed(2, 2, vec![1; 4]).unwrap())
        .unwrap();
    let mut frames = vec![Frame::with_layers(vec![Layer::new(sprite)])];
    for _ in 0..n_between {
        frames.push(Frame::default());
    }
    frames.push(Frame::with_layers(vec![
        Layer::new(sprite)
            .with_offset(10, 0)
            .with_color(Argb::WHITE.with_alpha(0)),
    ]));
    act.actions.push(Action { frames });
    act
}

#[test]
fn inserts_blended_frames_between_keys() {
    let mut act = keyframes(0);
    let mut p = EffectPipeline::new(Box::new(InterpolateEffect::new()));
    let cfg = EffectConfig::new("interpolate").with_param("frames", 3);
    act = p.preview(&act, &cfg).unwrap();
    let frames = &act.actions[0].frames;
    assert_eq!(frames.len(), 5);
    let xs: Vec<i32> = frames.iter().map(|f| f.layers[0].offset.x).collect();
    assert_eq!(xs, vec![0, 3, 5, 8, 10]);
    assert_eq!(frames[2].layers[0].color.a, 128);
}

#[test]
fn keeps_frames_between_distant_keys() {
    let mut act = keyframes(0);
    let sprite = act.actions[0].frames[0].layers[0].sprite;
    let key_b = act.actions[0].frames.pop().unwrap();
    for x in [1, 2] {
        act.actions[0]
            .frames
            .push(Frame::with_layers(vec![Layer::new(sprite).with_offset(x, 0)]));
    }
    act.actions[0].frames.push(key_b);
    act.actions[0].frames[3].layers[0].offset = Offset::new(30, 0);

    let mut p = EffectPipeline::new(Box::new(InterpolateEffect::new()));
    let cfg = EffectConfig::new("interpolate")
        .with_param("to_frame", 3)
        .with_param("frames", 1);
    let out = p.preview(&act, &cfg).unwrap();
    let xs: Vec<i32> = out.actions[0]
        .frames
        .iter()
        .map(|f| f.layers[0].offset.x)
        .collect();
    assert_eq!(xs, vec![0, 15, 1, 2, 30]);
}

#[test]
fn disabled_traits_keep_the_start_value() {
    let act = keyframes(0);
    let mut p = EffectPipeline::new(Box::new(InterpolateEffect::new()));
    let cfg = EffectConfig::new("interpolate").with_param("offset", false);
    let out = p.preview(&act, &cfg).unwrap();
    let mid = &out.actions[0].frames[1].layers[0];
    assert_eq!(mid.offset, Offset::new(0, 0));
    assert_eq!(mid.color.a, 128);
}

#[test]
fn unsatisfiable_keyframes_are_rejected_up_front() {
    let act = keyframes(0);
    let mut p = EffectPipeline::new(Box::new(InterpolateEffect::new()));
    for cfg in [
        EffectConfig::new("interpolate")
            .with_param("from_frame", 1)
            .with_param("to_frame", 1),
        EffectConfig::new("interpolate").with_param("to_frame", 2),
    ] {
        let err = p.preview(&act, &cfg).unwrap_err();
        assert!(matches!(err, FxError::Selection(_)), "{err}");
    }
}
