use crate::document::atlas::{Image, Palette, Texel};

/// Integer points of the segment `(x0, y0) -> (x1, y1)`, both ends included,
/// in drawing order (Bresenham).
pub fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut out = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        out.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    out
}

/// Draws a segment clipped to the image; returns the number of pixels written.
pub fn draw_line(
    image: &mut Image,
    from: (i32, i32),
    to: (i32, i32),
    value: Texel,
    palette: &Palette,
) -> usize {
    let mut written = 0;
    for (x, y) in line_points(from.0, from.1, to.0, to.1) {
        if image.in_bounds(x, y) {
            image.set_texel(x as u32, y as u32, value, palette);
            written += 1;
        }
    }
    written
}
