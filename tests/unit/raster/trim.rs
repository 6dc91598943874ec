use super::*;
use crate::document::atlas::{ImageKind, Pixels};
use crate::foundation::core::Argb;

#[test]
fn full_image_is_unchanged() {
    let pal = Palette::grayscale();
    let mut img = Image::from_indexed(3, 2, vec![1; 6]).unwrap();
    let before = img.clone();
    assert_eq!(trim_image(&mut img, &pal, 0, true).unwrap(), TrimOutcome::Unchanged);
    assert_eq!(img, before);
}

#[test]
fn blank_image_collapses_to_sentinel() {
    let pal = Palette::grayscale();
    let mut img = Image::new_rgba(5, 4);
    assert_eq!(trim_image(&mut img, &pal, 0, true).unwrap(), TrimOutcome::Emptied);
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(img.kind(), ImageKind::Rgba);
    assert!(img.is_stub(&pal));
    // Trimming the sentinel again is a no-op.
    assert_eq!(trim_image(&mut img, &pal, 0, true).unwrap(), TrimOutcome::Unchanged);
}

#[test]
fn crops_to_opaque_bounds() {
    let pal = Palette::grayscale();
    #[rustfmt::skip]
    let data = vec![
        0, 0, 0, 0,
        0, 5, 6, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    let mut img = Image::from_indexed(4, 4, data).unwrap();
    let out = trim_image(&mut img, &pal, 0, false).unwrap();
    assert_eq!(
        out,
        TrimOutcome::Cropped(TrimMargins {
            left: 1,
            top: 1,
            right: 1,
            bottom: 2
        })
    );
    assert_eq!(img.pixels, Pixels::Indexed(vec![5, 6]));
}

#[test]
fn even_snap_keeps_larger_side_one_pixel() {
    assert_eq!(snap_even(1, 2), (1, 1));
    assert_eq!(snap_even(3, 0), (2, 0));
    assert_eq!(snap_even(2, 2), (2, 2));
    assert_eq!(snap_even(0, 0), (0, 0));
}

#[test]
fn even_trim_leaves_even_totals() {
    let pal = Palette::grayscale();
    #[rustfmt::skip]
    let data = vec![
        0, 0, 0, 0,
        0, 5, 6, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    let mut img = Image::from_indexed(4, 4, data).unwrap();
    let out = trim_image(&mut img, &pal, 0, true).unwrap();
    assert_eq!(
        out,
        TrimOutcome::Cropped(TrimMargins {
            left: 1,
            top: 1,
            right: 1,
            bottom: 1
        })
    );
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn tolerance_treats_faint_pixels_as_transparent() {
    let pal = Palette::grayscale();
    let mut img = Image::from_rgba(
        3,
        1,
        vec![
            Argb::new(4, 0, 0, 0),
            Argb::new(255, 1, 1, 1),
            Argb::new(3, 0, 0, 0),
        ],
    )
    .unwrap();
    let out = trim_image(&mut img, &pal, 8, false).unwrap();
    assert!(matches!(out, TrimOutcome::Cropped(_)));
    assert_eq!(img.width, 1);
}
