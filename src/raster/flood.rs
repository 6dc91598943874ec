use std::collections::VecDeque;

use crate::document::atlas::{Image, Palette, Texel};

/// 4-connected region grown from `seeds` over pixels accepted by `inside`.
///
/// Returns a row-major visited bitmap of `width * height` entries. Seeds that
/// are out of bounds or rejected by `inside` are ignored.
pub fn flood_region(
    width: u32,
    height: u32,
    seeds: impl IntoIterator<Item = (u32, u32)>,
    mut inside: impl FnMut(u32, u32) -> bool,
) -> Vec<bool> {
    let w = width as usize;
    let mut visited = vec![false; w * height as usize];
    let mut queue = VecDeque::new();

    for (x, y) in seeds {
        if x < width && y < height {
            let i = y as usize * w + x as usize;
            if !visited[i] && inside(x, y) {
                visited[i] = true;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= width || ny >= height {
                continue;
            }
            let i = ny as usize * w + nx as usize;
            if !visited[i] && inside(nx, ny) {
                visited[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    visited
}

/// Replaces the 4-connected run of pixels equal to the seed pixel with
/// `replacement`. Returns the number of pixels changed.
pub fn flood_fill(image: &mut Image, x: u32, y: u32, replacement: Texel, palette: &Palette) -> usize {
    if x >= image.width || y >= image.height {
        return 0;
    }
    let target = image.texel(x, y);
    if target == replacement {
        return 0;
    }
    let region = {
        let img = &*image;
        flood_region(img.width, img.height, [(x, y)], |px, py| {
            img.texel(px, py) == target
        })
    };
    let mut filled = 0;
    for (i, hit) in region.iter().enumerate() {
        if *hit {
            let px = (i % image.width as usize) as u32;
            let py = (i / image.width as usize) as u32;
            image.set_texel(px, py, replacement, palette);
            filled += 1;
        }
    }
    filled
}

/// Transparent pixels reachable from the image border without crossing an
/// opaque pixel: the "outside" of a sprite, excluding enclosed holes.
pub fn exterior_mask(image: &Image, palette: &Palette, tolerance: u8) -> Vec<bool> {
    let (w, h) = (image.width, image.height);
    let border = (0..w)
        .flat_map(|x| [(x, 0), (x, h.saturating_sub(1))])
        .chain((0..h).flat_map(|y| [(0, y), (w.saturating_sub(1), y)]));
    flood_region(w, h, border, |x, y| {
        !image.is_opaque_at(x, y, palette, tolerance)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/flood.rs"]
mod tests;
