use super::*;
use crate::document::{
    atlas::{ImageKind, Palette},
    model::{Act, Action, Frame, Layer},
};
use crate::effects::{config::EffectConfig, pipeline::EffectPipeline};

fn moving_act(frames: usize) -> Act {
    let mut act = Act::new(Palette::grayscale());
    let sprite = act
        .insert_image(Image::from_indexed(2, 2, vec![0, 8, 8, 8]).unwrap())
        .unwrap();
    act.actions.push(Action {
        frames: (0..frames)
            .map(|i| Frame::with_layers(vec![Layer::new(sprite).with_offset(4 * i as i32, 0)]))
            .collect(),
    });
    act
}

#[test]
fn ghosts_sit_beneath_and_fade() {
    let mut p = EffectPipeline::new(Box::new(TrailEffect::new()));
    let cfg = EffectConfig::new("trail")
        .with_param("count", 2)
        .with_param("decay", 50);
    let out = p.preview(&moving_act(3), &cfg).unwrap();
    let frames = &out.actions[0].frames;
    assert_eq!(frames[0].layers.len(), 1);
    assert_eq!(frames[1].layers.len(), 2);
    let f2: Vec<(i32, u8)> = frames[2]
        .layers
        .iter()
        .map(|l| (l.offset.x, l.color.a))
        .collect();
    // Oldest ghost at the bottom, then the newer one, then the frame's own layer.
    assert_eq!(f2, vec![(0, 64), (4, 128), (8, 255)]);
}

#[test]
fn spacing_skips_frames() {
    let mut p = EffectPipeline::new(Box::new(TrailEffect::new()));
    let cfg = EffectConfig::new("trail")
        .with_param("count", 1)
        .with_param("spacing", 2);
    let out = p.preview(&moving_act(3), &cfg).unwrap();
    let frames = &out.actions[0].frames;
    assert_eq!(frames[1].layers.len(), 1);
    assert_eq!(frames[2].layers[0].offset.x, 0);
}

#[test]
fn silhouettes_share_one_flat_image() {
    let mut p = EffectPipeline::new(Box::new(TrailEffect::new()));
    let cfg = EffectConfig::new("trail")
        .with_param("silhouette", true)
        .with_param("red", 255)
        .with_param("green", 0)
        .with_param("blue", 0);
    let out = p.preview(&moving_act(4), &cfg).unwrap();
    assert_eq!(out.image_count(ImageKind::Rgba), 1);
    let ghost = &out.actions[0].frames[3].layers[0];
    let img = out.image(ghost.sprite).unwrap();
    assert_eq!(img.kind(), ImageKind::Rgba);
    assert_eq!(img.color_at(1, 1, &out.palette), Argb::opaque(255, 0, 0));
    assert!(img.color_at(0, 0, &out.palette).is_transparent());
    // Original layers keep drawing the indexed source.
    let own = out.actions[0].frames[3].layers.last().unwrap();
    assert_eq!(own.sprite.kind, ImageKind::Indexed);
}
