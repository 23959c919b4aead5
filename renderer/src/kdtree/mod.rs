use cgmath::Point3;
use rayon::prelude::*;

/// Anything a `PointKdTree` can be built over: a position in space plus
/// whatever payload the owner (photon maps, irradiance caches) wants to
/// get back out of a lookup.
pub trait KdPoint {
    fn position(&self) -> Point3<f32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn get(self, p: &Point3<f32>) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

enum KdNode {
    Leaf { index: u32 },
    Interior { axis: Axis, split_pos: f32, index: u32, right_child: u32 },
}

impl KdNode {
    fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }
}

/// A balanced k-d tree over a fixed set of points, used to answer
/// fixed-radius and fixed-count nearest-neighbor queries during photon
/// gathering. Built once (the top levels in parallel via rayon) and never
/// mutated afterward.
pub struct PointKdTree<T: KdPoint> {
    nodes: Vec<KdNode>,
    points: Vec<T>,
}

/// Depth, counted from the root, below which `build` stops forking new
/// rayon tasks and recurses sequentially. Keeps the parallel fan-out
/// bounded to roughly the thread pool's size instead of one task per leaf.
const MAX_PARALLEL_DEPTH: u32 = 4;

impl<T: KdPoint + Send> PointKdTree<T> {
    pub fn build(points: Vec<T>) -> Self {
        let n = points.len();
        if n == 0 {
            return Self { nodes: Vec::new(), points };
        }
        let mut indices: Vec<u32> = (0..n as u32).collect();
        let mut nodes = vec![KdNode::Leaf { index: 0 }; 2 * n];
        let mut next_free = 0u32;
        build_recursive(&points, &mut indices, &mut nodes, &mut next_free, 0);
        nodes.truncate(next_free as usize);
        Self { nodes, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[T] {
        &self.points
    }

    /// Visit every point within `max_dist_squared` of `p`, nearest first
    /// is not guaranteed; `proc` may shrink `max_dist_squared` as it goes
    /// (e.g. once it has collected enough photons) to prune the search.
    pub fn lookup(&self, p: Point3<f32>, max_dist_squared: &mut f32, mut proc: impl FnMut(&T, f32, &mut f32)) {
        if self.nodes.is_empty() {
            return;
        }
        let mut stack: Vec<(u32, f32, Axis)> = Vec::with_capacity(64);
        let mut curr = 0u32;
        loop {
            loop {
                match &self.nodes[curr as usize] {
                    KdNode::Leaf { index } => {
                        let point = &self.points[*index as usize];
                        let d2 = distance_squared(p, point.position());
                        if d2 < *max_dist_squared {
                            proc(point, d2, max_dist_squared);
                        }
                        break;
                    }
                    KdNode::Interior { axis, split_pos, right_child, .. } => {
                        let axis_val = axis.get(&p);
                        if axis_val <= *split_pos {
                            stack.push((*right_child, *split_pos, *axis));
                            curr += 1;
                        } else {
                            stack.push((curr + 1, *split_pos, *axis));
                            curr = *right_child;
                        }
                    }
                }
            }
            loop {
                match stack.pop() {
                    None => return,
                    Some((far_child, split_pos, axis)) => {
                        let axis_val = axis.get(&p);
                        let diff = axis_val - split_pos;
                        if diff * diff < *max_dist_squared {
                            curr = far_child;
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn distance_squared(a: Point3<f32>, b: Point3<f32>) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y + d.z * d.z
}

fn bounds<T: KdPoint>(points: &[T], indices: &[u32]) -> (Point3<f32>, Point3<f32>) {
    let mut min = points[indices[0] as usize].position();
    let mut max = min;
    for &i in &indices[1..] {
        let p = points[i as usize].position();
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    (min, max)
}

fn largest_axis(min: Point3<f32>, max: Point3<f32>) -> Axis {
    let d = max - min;
    if d.x > d.y && d.x > d.z {
        Axis::X
    } else if d.y > d.z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// Recursively partitions `indices[..]` in place (nth_element-style median
/// split on the bounding box's longest axis) and fills `nodes` starting at
/// `*next_free`, mirroring the allocation scheme of the tree it mutates.
fn build_recursive<T: KdPoint + Send>(
    points: &[T],
    indices: &mut [u32],
    nodes: &mut [KdNode],
    next_free: &mut u32,
    depth: u32,
) {
    if indices.len() == 1 {
        let cur = *next_free;
        nodes[cur as usize] = KdNode::Leaf { index: indices[0] };
        *next_free += 1;
        return;
    }

    let (min, max) = bounds(points, indices);
    let axis = largest_axis(min, max);
    let mid = indices.len() / 2;
    indices.select_nth_unstable_by(mid, |&a, &b| {
        let pa = axis.get(&points[a as usize].position());
        let pb = axis.get(&points[b as usize].position());
        pa.partial_cmp(&pb).unwrap()
    });
    let split_pos = axis.get(&points[indices[mid] as usize].position());

    let cur = *next_free;
    *next_free += 1;
    let (left, right) = indices.split_at_mut(mid);

    if depth < MAX_PARALLEL_DEPTH && left.len() > 256 {
        let mut left_next = 0u32;
        let mut right_next = 0u32;
        let mut left_nodes = vec![KdNode::Leaf { index: 0 }; 2 * left.len()];
        let mut right_nodes = vec![KdNode::Leaf { index: 0 }; 2 * right.len()];
        rayon::join(
            || build_recursive(points, left, &mut left_nodes, &mut left_next, depth + 1),
            || build_recursive(points, right, &mut right_nodes, &mut right_next, depth + 1),
        );
        left_nodes.truncate(left_next as usize);
        right_nodes.truncate(right_next as usize);

        let left_base = *next_free;
        for node in left_nodes {
            nodes[*next_free as usize] = shift_right_child(node, left_base);
            *next_free += 1;
        }
        let right_base = *next_free;
        for node in right_nodes {
            nodes[*next_free as usize] = shift_right_child(node, right_base);
            *next_free += 1;
        }
        nodes[cur as usize] = KdNode::Interior { axis, split_pos, index: 0, right_child: right_base };
    } else {
        build_recursive(points, left, nodes, next_free, depth + 1);
        let right_base = *next_free;
        build_recursive(points, right, nodes, next_free, depth + 1);
        nodes[cur as usize] = KdNode::Interior { axis, split_pos, index: 0, right_child: right_base };
    }
}

fn shift_right_child(node: KdNode, base: u32) -> KdNode {
    match node {
        KdNode::Leaf { index } => KdNode::Leaf { index },
        KdNode::Interior { axis, split_pos, index, right_child } => {
            KdNode::Interior { axis, split_pos, index, right_child: right_child + base }
        }
    }
}

impl Clone for KdNode {
    fn clone(&self) -> Self {
        match self {
            KdNode::Leaf { index } => KdNode::Leaf { index: *index },
            KdNode::Interior { axis, split_pos, index, right_child } => {
                KdNode::Interior { axis: *axis, split_pos: *split_pos, index: *index, right_child: *right_child }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct P(Point3<f32>);
    impl KdPoint for P {
        fn position(&self) -> Point3<f32> {
            self.0
        }
    }

    #[test]
    fn finds_nearest_in_a_grid() {
        let mut pts = Vec::new();
        for x in 0..5 {
            for y in 0..5 {
                pts.push(P(Point3::new(x as f32, y as f32, 0.0)));
            }
        }
        let tree = PointKdTree::build(pts);
        let mut max_d2 = f32::INFINITY;
        let mut found = Vec::new();
        tree.lookup(Point3::new(2.0, 2.0, 0.0), &mut max_d2, |p, d2, _| found.push((p.0, d2)));
        assert_eq!(found.len(), 25);
        assert!(found.iter().any(|(p, d2)| *p == Point3::new(2.0, 2.0, 0.0) && *d2 == 0.0));
    }

    #[test]
    fn radius_query_prunes_far_points() {
        let mut pts = Vec::new();
        for x in 0..10 {
            pts.push(P(Point3::new(x as f32, 0.0, 0.0)));
        }
        let tree = PointKdTree::build(pts);
        let mut max_d2 = 2.25;
        let mut found = Vec::new();
        tree.lookup(Point3::new(5.0, 0.0, 0.0), &mut max_d2, |p, d2, _| found.push((p.0, d2)));
        assert!(found.iter().all(|(_, d2)| *d2 <= 2.25));
        assert!(found.iter().any(|(p, _)| *p == Point3::new(5.0, 0.0, 0.0)));
        assert!(!found.iter().any(|(p, _)| *p == Point3::new(0.0, 0.0, 0.0)));
    }
}
