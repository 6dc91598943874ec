use super::*;
use crate::document::{
    atlas::{Image, Palette},
    model::{Action, Frame, Layer},
};

fn act_with(frames: &[usize]) -> Act {
    let mut act = Act::new(Palette::grayscale());
    let sprite = act.insert_image(Image::new_indexed(1, 1)).unwrap();
    for &n in frames {
        act.actions.push(Action {
            frames: vec![Frame::with_layers(vec![Layer::new(sprite)]); n],
        });
    }
    act
}

#[test]
fn config_parses_with_defaults() {
    let cfg = EffectConfig::from_json(r#"{"effect": "crystal"}"#).unwrap();
    assert_eq!(cfg.effect, "crystal");
    assert!(cfg.params.is_empty());
    assert!(cfg.selection.is_none());
    assert_eq!(cfg.cleanup, CleanupOptions::default());
    assert!(cfg.cleanup.even_trim);

    let cfg = EffectConfig::from_json(
        r#"{"effect": "stripe", "params": {"seed": 3}, "selection": {"actions": [1], "anim_length": 4}}"#,
    )
    .unwrap();
    let sel = cfg.selection.unwrap();
    assert_eq!(sel.actions, vec![1]);
    assert_eq!(sel.anim_length, Some(4));
    assert!(!sel.loop_frames);
}

#[test]
fn empty_action_list_selects_all() {
    let act = act_with(&[2, 3, 1]);
    let sel = Selection::default();
    assert_eq!(sel.action_indices(&act), vec![0, 1, 2]);
    let sel = Selection {
        actions: vec![2, 0, 2],
        ..Selection::default()
    };
    assert_eq!(sel.action_indices(&act), vec![0, 2]);
}

#[test]
fn validate_rejects_unsatisfiable_selections() {
    let act = act_with(&[2]);
    let bad = [
        Selection {
            actions: vec![5],
            ..Selection::default()
        },
        Selection {
            layers: Some(LayerRange { start: 2, end: 2 }),
            ..Selection::default()
        },
        Selection {
            anim_length: Some(0),
            ..Selection::default()
        },
    ];
    for sel in bad {
        assert!(matches!(sel.validate(&act), Err(FxError::Selection(_))), "{sel:?}");
    }
    assert!(Selection::default().validate(&act).is_ok());
    assert!(Selection::default().validate(&act_with(&[])).is_err());
}

#[test]
fn validate_checks_anim_start_in_every_action() {
    let act = act_with(&[5, 2]);
    let late = Selection {
        anim_start: 3,
        ..Selection::default()
    };
    assert!(matches!(late.validate(&act), Err(FxError::Selection(_))));
    let only_long = Selection {
        actions: vec![0],
        ..late.clone()
    };
    assert!(only_long.validate(&act).is_ok());
    let looped = Selection {
        loop_frames: true,
        anim_length: Some(2),
        ..late
    };
    assert!(looped.validate(&act).is_ok());
}

#[test]
fn anim_range_steps() {
    let sel = Selection {
        anim_start: 1,
        anim_length: Some(3),
        ..Selection::default()
    };
    let r = sel.anim_range(10).unwrap();
    assert_eq!(r.frames(), 1..4);
    assert_eq!(r.total_steps(), 2);
    assert_eq!(r.step_of(3), 2);
    assert_eq!(r.progress(2), 1.0);

    // Clamped to the action; a single frame still has one step.
    let r = sel.anim_range(2).unwrap();
    assert_eq!(r.frames(), 1..2);
    assert_eq!(r.total_steps(), 1);
    assert!(sel.anim_range(1).is_err());
}

#[test]
fn layer_range_is_half_open() {
    let sel = Selection {
        layers: Some(LayerRange { start: 1, end: 3 }),
        ..Selection::default()
    };
    assert!(!sel.layer_selected(0));
    assert!(sel.layer_selected(1));
    assert!(sel.layer_selected(2));
    assert!(!sel.layer_selected(3));
    assert!(Selection::default().layer_selected(99));
}
