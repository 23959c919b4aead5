use cgmath::{BaseNum, Point2, Vector2};

/// An axis-aligned 2-D bounding box over integer or floating point
/// coordinates, used for both pixel-space film tiles and raster-space
/// sample bounds.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Bounds2<S> {
    pub min: Point2<S>,
    pub max: Point2<S>,
}

impl<S: BaseNum> Bounds2<S> {
    pub fn new(min: Point2<S>, max: Point2<S>) -> Self {
        Self { min, max }
    }

    pub fn diagonal(&self) -> Vector2<S> {
        self.max - self.min
    }

    pub fn area(&self) -> S {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Returns the intersection of two bounds, or `None` if they don't
    /// overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let min = Point2::new(
            partial_max(self.min.x, other.min.x),
            partial_max(self.min.y, other.min.y),
        );
        let max = Point2::new(
            partial_min(self.max.x, other.max.x),
            partial_min(self.max.y, other.max.y),
        );
        if min.x < max.x && min.y < max.y {
            Some(Self::new(min, max))
        } else {
            None
        }
    }

    pub fn contains(&self, p: Point2<S>) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

impl Bounds2<i32> {
    /// Iterates over every integer pixel coordinate in `[min, max)`, in
    /// row-major order.
    pub fn range(&self) -> Bounds2Iter {
        Bounds2Iter {
            bounds: *self,
            next: if self.min.x < self.max.x && self.min.y < self.max.y {
                Some(self.min)
            } else {
                None
            },
        }
    }
}

fn partial_max<S: PartialOrd>(a: S, b: S) -> S {
    if a > b {
        a
    } else {
        b
    }
}

fn partial_min<S: PartialOrd>(a: S, b: S) -> S {
    if a < b {
        a
    } else {
        b
    }
}

pub struct Bounds2Iter {
    bounds: Bounds2<i32>,
    next: Option<Point2<i32>>,
}

impl Iterator for Bounds2Iter {
    type Item = Point2<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut nx = current.x + 1;
        let mut ny = current.y;
        if nx >= self.bounds.max.x {
            nx = self.bounds.min.x;
            ny += 1;
        }
        self.next = if ny < self.bounds.max.y {
            Some(Point2::new(nx, ny))
        } else {
            None
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_visits_every_pixel_row_major() {
        let b = Bounds2::new(Point2::new(0, 0), Point2::new(2, 2));
        let pts: Vec<_> = b.range().collect();
        assert_eq!(
            pts,
            vec![
                Point2::new(0, 0),
                Point2::new(1, 0),
                Point2::new(0, 1),
                Point2::new(1, 1),
            ]
        );
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Bounds2::new(Point2::new(0, 0), Point2::new(1, 1));
        let b = Bounds2::new(Point2::new(5, 5), Point2::new(6, 6));
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn area_of_unit_square() {
        let b = Bounds2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 3.0));
        assert_eq!(b.area(), 6.0);
    }
}
