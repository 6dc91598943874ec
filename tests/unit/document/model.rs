use super::*;

fn dot(fill: u8) -> Image {
    Image::from_indexed(1, 1, vec![fill]).unwrap()
}

fn act_with_refs() -> Act {
    let mut act = Act::new(Palette::grayscale());
    let a = act.insert_image(dot(1)).unwrap();
    let b = act.insert_image(dot(2)).unwrap();
    let c = act.insert_image(Image::new_rgba(1, 1)).unwrap();
    act.actions.push(Action {
        frames: vec![Frame::with_layers(vec![
            Layer::new(a),
            Layer::new(b),
            Layer::new(c),
        ])],
    });
    act
}

fn loc(layer: usize) -> LayerLoc {
    LayerLoc {
        action: 0,
        frame: 0,
        layer,
    }
}

#[test]
fn insert_at_shifts_same_kind_references_only() {
    let mut act = act_with_refs();
    let new = act.insert_image_at(0, dot(9)).unwrap();
    assert_eq!(new, SpriteRef::indexed(0));
    assert_eq!(act.layer(loc(0)).unwrap().sprite, SpriteRef::indexed(1));
    assert_eq!(act.layer(loc(1)).unwrap().sprite, SpriteRef::indexed(2));
    assert_eq!(act.layer(loc(2)).unwrap().sprite, SpriteRef::rgba(0));
    // Visual identity: layer 1 still draws palette index 2.
    let img = act.image(act.layer(loc(1)).unwrap().sprite).unwrap();
    assert_eq!(img.pixels, crate::document::atlas::Pixels::Indexed(vec![2]));
    act.validate().unwrap();
}

#[test]
fn remove_refuses_images_in_use() {
    let mut act = act_with_refs();
    let err = act.remove_image(SpriteRef::indexed(0)).unwrap_err();
    assert!(matches!(err, FxError::Document(_)));
}

#[test]
fn remove_shifts_later_references_down() {
    let mut act = act_with_refs();
    act.frame_mut(0, 0).unwrap().layers.remove(0);
    act.remove_image(SpriteRef::indexed(0)).unwrap();
    assert_eq!(act.layer(loc(0)).unwrap().sprite, SpriteRef::indexed(0));
    assert_eq!(act.image_count(ImageKind::Indexed), 1);
    act.validate().unwrap();
}

#[test]
fn validate_reports_dangling_reference() {
    let mut act = act_with_refs();
    act.layer_mut(loc(0)).unwrap().sprite = SpriteRef::indexed(7);
    assert!(matches!(act.validate(), Err(FxError::Document(_))));
}

#[test]
fn out_of_bounds_lookups_are_selection_errors() {
    let act = act_with_refs();
    assert!(matches!(act.action(3), Err(FxError::Selection(_))));
    assert!(matches!(act.frame(0, 1), Err(FxError::Selection(_))));
    assert!(matches!(act.layer(loc(5)), Err(FxError::Selection(_))));
}

#[test]
fn action_kind_splits_type_and_direction() {
    assert_eq!(Act::action_kind(0), (0, 0));
    assert_eq!(Act::action_kind(13), (1, 5));
}

#[test]
fn json_round_trip_preserves_document() {
    let act = act_with_refs();
    let json = act.to_json().unwrap();
    let back = Act::from_json(&json).unwrap();
    assert_eq!(back, act);
}
