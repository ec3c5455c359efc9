//! Binary space partitioning of the dungeon area into room candidates.

use crate::geometry::Bounds;
use rand::Rng;

/// A node in the BSP tree. Either a leaf or an internal node with two children.
struct BspNode {
    /// The region this node covers
    region: Bounds,
    /// Left/bottom child after split
    left: Option<Box<BspNode>>,
    /// Right/top child after split
    right: Option<Box<BspNode>>,
}

impl BspNode {
    fn new(region: Bounds) -> Self {
        Self {
            region,
            left: None,
            right: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Recursively split this node until no axis can hold two minimum-size halves.
    fn split(&mut self, min_width: i32, min_height: i32, rng: &mut impl Rng) {
        let can_split_h = self.region.height >= min_height * 2;
        let can_split_v = self.region.width >= min_width * 2;
        if !can_split_h && !can_split_v {
            return;
        }

        // Prefer cutting the longer axis of strongly stretched regions
        let prefer_horizontal = if self.region.width > self.region.height * 2 {
            false
        } else if self.region.height > self.region.width * 2 {
            true
        } else {
            rng.gen_bool(0.5)
        };
        let split_horizontal = if prefer_horizontal { can_split_h } else { !can_split_v };

        let (first, second) = if split_horizontal {
            // Keep both halves at least min_height tall
            let split_y = rng.gen_range(min_height..=self.region.height - min_height);
            (
                Bounds::new(self.region.x, self.region.y, self.region.width, split_y),
                Bounds::new(
                    self.region.x,
                    self.region.y + split_y,
                    self.region.width,
                    self.region.height - split_y,
                ),
            )
        } else {
            let split_x = rng.gen_range(min_width..=self.region.width - min_width);
            (
                Bounds::new(self.region.x, self.region.y, split_x, self.region.height),
                Bounds::new(
                    self.region.x + split_x,
                    self.region.y,
                    self.region.width - split_x,
                    self.region.height,
                ),
            )
        };

        let mut left = Box::new(BspNode::new(first));
        let mut right = Box::new(BspNode::new(second));
        left.split(min_width, min_height, rng);
        right.split(min_width, min_height, rng);
        self.left = Some(left);
        self.right = Some(right);
    }

    /// Collect leaf regions, left subtree first.
    fn collect_leaves(&self, leaves: &mut Vec<Bounds>) {
        if self.is_leaf() {
            leaves.push(self.region);
            return;
        }
        if let Some(ref left) = self.left {
            left.collect_leaves(leaves);
        }
        if let Some(ref right) = self.right {
            right.collect_leaves(leaves);
        }
    }
}

/// Split `bounds` into non-overlapping leaves that are each at least
/// `min_width` x `min_height` and together cover `bounds`.
///
/// Bounds smaller than the minimum (or non-positive minima) come back unsplit.
pub fn partition(
    bounds: Bounds,
    min_width: i32,
    min_height: i32,
    rng: &mut impl Rng,
) -> Vec<Bounds> {
    puffin::profile_function!();

    if min_width <= 0 || min_height <= 0 || bounds.width < min_width || bounds.height < min_height {
        log::debug!(
            "partition: {:?} cannot hold a {}x{} room, returning it unsplit",
            bounds,
            min_width,
            min_height
        );
        return vec![bounds];
    }

    let mut root = BspNode::new(bounds);
    root.split(min_width, min_height, rng);

    let mut leaves = Vec::new();
    root.collect_leaves(&mut leaves);
    leaves
}

/// Shrink every rectangle by `offset` on all sides.
///
/// Rectangles left without a positive size are dropped.
pub fn apply_offset(rects: &[Bounds], offset: i32) -> Vec<Bounds> {
    rects
        .iter()
        .filter_map(|rect| {
            let inset = rect.inset(offset);
            if inset.is_empty() {
                log::warn!("offset {} consumes room {:?}, dropping it", offset, rect);
                None
            } else {
                Some(inset)
            }
        })
        .collect()
}

/// Shrink `rect` around its center so it is at most `max_width` x `max_height`.
pub fn clamp_to_max(rect: Bounds, max_width: i32, max_height: i32) -> Bounds {
    let width = rect.width.min(max_width);
    let height = rect.height.min(max_height);
    Bounds::new(
        rect.x + (rect.width - width) / 2,
        rect.y + (rect.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid_partition(bounds: Bounds, leaves: &[Bounds], min_w: i32, min_h: i32) {
        let mut covered = 0;
        for (i, a) in leaves.iter().enumerate() {
            assert!(a.width >= min_w && a.height >= min_h, "{:?} below minimum", a);
            assert!(a.x >= bounds.x && a.max_x() <= bounds.max_x());
            assert!(a.y >= bounds.y && a.max_y() <= bounds.max_y());
            for b in &leaves[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
            covered += a.area();
        }
        assert_eq!(covered, bounds.area());
    }

    #[test]
    fn test_bsp_node_is_leaf() {
        let node = BspNode::new(Bounds::new(0, 0, 10, 10));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_bsp_split_creates_children() {
        let mut node = BspNode::new(Bounds::new(0, 0, 100, 100));
        let mut rng = rand::thread_rng();
        node.split(10, 10, &mut rng);
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_bsp_small_node_doesnt_split() {
        let mut node = BspNode::new(Bounds::new(0, 0, 5, 5));
        let mut rng = rand::thread_rng();
        node.split(4, 4, &mut rng);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_partition_respects_minimums() {
        let bounds = Bounds::new(0, 0, 20, 20);
        let mut rng = StdRng::seed_from_u64(7);
        let leaves = partition(bounds, 4, 4, &mut rng);
        assert!(leaves.len() > 1);
        assert_valid_partition(bounds, &leaves, 4, 4);
        // No leaf could be split any further
        assert!(leaves.iter().all(|l| l.width < 8 && l.height < 8));
    }

    #[test]
    fn test_partition_degenerate_input_returned_unsplit() {
        let bounds = Bounds::new(3, 3, 5, 2);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(partition(bounds, 4, 4, &mut rng), vec![bounds]);
        assert_eq!(partition(bounds, 0, 4, &mut rng), vec![bounds]);
    }

    #[test]
    fn test_apply_offset_shrinks_and_rejects() {
        let rects = [Bounds::new(0, 0, 6, 6), Bounds::new(6, 0, 2, 6)];
        let inset = apply_offset(&rects, 1);
        assert_eq!(inset, vec![Bounds::new(1, 1, 4, 4)]);
    }

    #[test]
    fn test_clamp_to_max_centers_room() {
        let clamped = clamp_to_max(Bounds::new(0, 0, 10, 4), 6, 6);
        assert_eq!(clamped, Bounds::new(2, 0, 6, 4));
    }

    proptest! {
        #[test]
        fn prop_partition_leaves_are_valid(
            x in -20i32..20,
            y in -20i32..20,
            w in 1i32..60,
            h in 1i32..60,
            min_w in 1i32..10,
            min_h in 1i32..10,
            seed in any::<u64>(),
        ) {
            let bounds = Bounds::new(x, y, w, h);
            let mut rng = StdRng::seed_from_u64(seed);
            let leaves = partition(bounds, min_w, min_h, &mut rng);
            if w < min_w || h < min_h {
                prop_assert_eq!(leaves, vec![bounds]);
            } else {
                assert_valid_partition(bounds, &leaves, min_w, min_h);
            }
        }
    }
}
