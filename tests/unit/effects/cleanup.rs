use super::*;
use crate::document::{
    atlas::{Image, Palette},
    model::{Action, Frame, Layer},
};
use crate::foundation::core::Offset;

fn corner_image() -> Image {
    let mut data = vec![0u8; 16];
    data[15] = 9;
    Image::from_indexed(4, 4, data).unwrap()
}

fn setup(layers: Vec<Layer>) -> Act {
    let mut act = Act::new(Palette::grayscale());
    act.actions.push(Action {
        frames: vec![Frame::with_layers(layers)],
    });
    act
}

#[test]
fn trim_keeps_layer_pixels_in_place() {
    let mut act = setup(Vec::new());
    let sprite = act.insert_image(corner_image()).unwrap();
    act.actions[0].frames[0].layers = vec![
        Layer::new(sprite),
        Layer::new(sprite).with_offset(10, 0),
        Layer {
            mirror: true,
            ..Layer::new(sprite)
        },
    ];
    let mut session = Session::new();
    session.inserted.insert(sprite);
    session.actions.insert(0);

    let report = run_cleanup(&mut act, &session, &CleanupOptions::default()).unwrap();
    assert_eq!(report.trimmed, 1);
    let img = act.image(sprite).unwrap();
    // Odd trims of 3 snap to 2 so the image stays 2x2.
    assert_eq!((img.width, img.height), (2, 2));
    let layers = &act.actions[0].frames[0].layers;
    assert_eq!(layers[0].offset, Offset::new(1, 1));
    assert_eq!(layers[1].offset, Offset::new(11, 1));
    assert_eq!(layers[2].offset, Offset::new(-1, 1));
}

#[test]
fn rotated_layers_move_along_their_axes() {
    let mut act = setup(Vec::new());
    let sprite = act.insert_image(corner_image()).unwrap();
    act.actions[0].frames[0].layers = vec![Layer::new(sprite).with_rotation(90)];
    let mut session = Session::new();
    session.inserted.insert(sprite);

    let opts = CleanupOptions {
        even_trim: false,
        ..CleanupOptions::default()
    };
    run_cleanup(&mut act, &session, &opts).unwrap();
    let img = act.image(sprite).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
    // Local shift (1.5, 1.5) rotated clockwise by 90 degrees in y-down space.
    assert_eq!(act.actions[0].frames[0].layers[0].offset, Offset::new(-2, 2));
}

#[test]
fn untouched_images_are_left_alone() {
    let mut act = setup(Vec::new());
    let sprite = act.insert_image(corner_image()).unwrap();
    act.actions[0].frames[0].layers = vec![Layer::new(sprite)];
    let report = run_cleanup(&mut act, &Session::new(), &CleanupOptions::default()).unwrap();
    assert_eq!(report, CleanupReport::default());
    assert_eq!(act.image(sprite).unwrap().width, 4);
}

#[test]
fn emptied_images_are_dropped_with_their_layers() {
    let mut act = setup(Vec::new());
    let keep = act.insert_image(corner_image()).unwrap();
    let blank = act.insert_image(Image::new_indexed(3, 3)).unwrap();
    let after = act.insert_image(corner_image()).unwrap();
    act.actions[0].frames[0].layers = vec![
        Layer::new(keep),
        Layer::new(blank),
        Layer::new(after).with_offset(1, 1),
    ];
    let mut session = Session::new();
    session.inserted.insert(blank);
    session.actions.insert(0);

    let report = run_cleanup(&mut act, &session, &CleanupOptions::default()).unwrap();
    assert_eq!(report.emptied, 1);
    assert_eq!(report.dropped_layers, 1);
    assert_eq!(report.removed_images, 1);
    let layers = &act.actions[0].frames[0].layers;
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].sprite, keep);
    // The later image moved down one slot and its layer followed.
    assert_eq!(layers[1].sprite, SpriteRef::indexed(1));
    assert_eq!(act.image_count(crate::document::atlas::ImageKind::Indexed), 2);
    assert!(act.validate().is_ok());
}

#[test]
fn stubs_survive_when_removal_is_disabled() {
    let mut act = setup(Vec::new());
    let blank = act.insert_image(Image::new_rgba(2, 2)).unwrap();
    act.actions[0].frames[0].layers = vec![Layer::new(blank)];
    let mut session = Session::new();
    session.inserted.insert(blank);
    session.actions.insert(0);
    let opts = CleanupOptions {
        remove_stubs: false,
        ..CleanupOptions::default()
    };
    let report = run_cleanup(&mut act, &session, &opts).unwrap();
    assert_eq!(report.emptied, 1);
    assert_eq!(report.removed_images, 0);
    assert_eq!(act.actions[0].frames[0].layers.len(), 1);
    assert!(act.image(blank).unwrap().is_stub(&act.palette));
}
