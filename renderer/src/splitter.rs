use rand::seq::SliceRandom;
use rand::Rng;

/// A tile of the image in device coordinates, `w`/`h` clipped to the
/// image bounds at the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The order worker threads pull tiles off the queue in. `CentreFirst`
/// keeps early previews visually informative by rendering the middle of
/// the frame first; `Random` avoids every thread finishing its tiles at
/// the same wall-clock moment when tile cost correlates with position
/// (e.g. a sky tile finishes faster than a tile full of geometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOrder {
    Linear,
    CentreFirst,
    Random,
}

/// Splits an image into a grid of square (edge-clipped) tiles for
/// parallel rendering, ordering them per `TileOrder`.
pub struct ImageSplitter {
    regions: Vec<Region>,
}

impl ImageSplitter {
    pub fn new(width: i32, height: i32, x0: i32, y0: i32, block_size: i32, order: TileOrder, rng: &mut impl Rng) -> Self {
        let mut regions = Vec::new();
        let mut y = 0;
        while y < height {
            let h = block_size.min(height - y);
            let mut x = 0;
            while x < width {
                let w = block_size.min(width - x);
                regions.push(Region { x: x0 + x, y: y0 + y, w, h });
                x += block_size;
            }
            y += block_size;
        }

        match order {
            TileOrder::Linear => {}
            TileOrder::CentreFirst => {
                let cx = x0 + width / 2;
                let cy = y0 + height / 2;
                regions.sort_by_key(|r| {
                    let dx = r.x - cx;
                    let dy = r.y - cy;
                    dx * dx + dy * dy
                });
            }
            TileOrder::Random => regions.shuffle(rng),
        }

        Self { regions }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn get(&self, n: usize) -> Option<Region> {
        self.regions.get(n).copied()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn covers_every_pixel_exactly_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let splitter = ImageSplitter::new(37, 23, 0, 0, 16, TileOrder::Linear, &mut rng);
        let mut covered = vec![false; 37 * 23];
        for r in splitter.regions() {
            for y in r.y..r.y + r.h {
                for x in r.x..r.x + r.w {
                    let idx = (y * 37 + x) as usize;
                    assert!(!covered[idx], "pixel ({x},{y}) covered twice");
                    covered[idx] = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn centre_first_starts_near_the_middle() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let splitter = ImageSplitter::new(64, 64, 0, 0, 16, TileOrder::CentreFirst, &mut rng);
        let first = splitter.get(0).unwrap();
        assert!((first.x - 32).abs() <= 16);
        assert!((first.y - 32).abs() <= 16);
    }
}
