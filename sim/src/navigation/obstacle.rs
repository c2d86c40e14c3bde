//! Static obstacle regions and the collision query run against them.

use log::trace;

// ============================================================================
// Obstacle Types
// ============================================================================

/// Axis-aligned blocking region on the XZ plane.
///
/// Without a vertical extent the obstacle blocks at every height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
    /// Optional `(min_y, max_y)` range, inclusive
    pub vertical: Option<(f32, f32)>,
}

impl Obstacle {
    /// Create a region from two corners (swapped corners are normalized)
    pub fn from_corners(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_z: min_z.min(max_z),
            max_x: min_x.max(max_x),
            max_z: min_z.max(max_z),
            vertical: None,
        }
    }

    /// Create a region from center position and half-extents
    pub fn from_center(center_x: f32, center_z: f32, half_width: f32, half_depth: f32) -> Self {
        Self::from_corners(
            center_x - half_width,
            center_z - half_depth,
            center_x + half_width,
            center_z + half_depth,
        )
    }

    /// Restrict the region to a vertical band
    pub fn with_vertical_extent(mut self, min_y: f32, max_y: f32) -> Self {
        self.vertical = Some((min_y.min(max_y), min_y.max(max_y)));
        self
    }

    /// Build from the scene's flat tuple form:
    /// `[min_x, min_z, max_x, max_z]` or `[min_x, min_z, max_x, max_z, min_y, max_y]`.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match *values {
            [min_x, min_z, max_x, max_z] => Some(Self::from_corners(min_x, min_z, max_x, max_z)),
            [min_x, min_z, max_x, max_z, min_y, max_y] => {
                Some(Self::from_corners(min_x, min_z, max_x, max_z).with_vertical_extent(min_y, max_y))
            }
            _ => None,
        }
    }

    /// Whether a height falls inside the vertical band (always true without one)
    pub fn covers_height(&self, y: f32) -> bool {
        match self.vertical {
            Some((min_y, max_y)) => y >= min_y && y <= max_y,
            None => true,
        }
    }

    /// Strict overlap of the padded square footprint with the rectangle.
    /// Touching edges do not count.
    pub fn overlaps_footprint(&self, x: f32, z: f32, radius: f32) -> bool {
        x - radius < self.max_x
            && x + radius > self.min_x
            && z - radius < self.max_z
            && z + radius > self.min_z
    }

    /// Full blocking test for an agent of the given radius standing at height `y`
    pub fn blocks(&self, x: f32, z: f32, y: f32, radius: f32) -> bool {
        self.overlaps_footprint(x, z, radius) && self.covers_height(y)
    }

    /// Point-in-rectangle test on the XZ plane (strict)
    pub fn contains_point(&self, x: f32, z: f32) -> bool {
        self.overlaps_footprint(x, z, 0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_z + self.max_z) * 0.5,
        )
    }
}

// ============================================================================
// Collision Query
// ============================================================================

/// Read-only "is this spot blocked" query.
///
/// Callers only see this trait, so the registry can move from a linear scan to
/// a grid or BVH without touching movement code.
pub trait CollisionQuery: Send + Sync {
    /// True iff the padded footprint `[x-r, x+r] × [z-r, z+r]` at height `y`
    /// intersects any obstacle.
    fn is_blocked(&self, x: f32, z: f32, y: f32, radius: f32) -> bool;
}

/// Flat, immutable list of obstacles built once at scene construction
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }
}

impl FromIterator<Obstacle> for ObstacleRegistry {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl CollisionQuery for ObstacleRegistry {
    fn is_blocked(&self, x: f32, z: f32, y: f32, radius: f32) -> bool {
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if obstacle.blocks(x, z, y, radius) {
                trace!(
                    "[COLLISION] pos=({:.2}, {:.2}, {:.2}) r={:.2} hits obstacle {} ({:.2},{:.2})->({:.2},{:.2})",
                    x, y, z, radius, i, obstacle.min_x, obstacle.min_z, obstacle.max_x, obstacle.max_z
                );
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_inside_and_outside() {
        let registry = ObstacleRegistry::new(vec![Obstacle::from_corners(0.0, 0.0, 10.0, 10.0)]);

        assert!(registry.is_blocked(5.0, 5.0, 0.0, 0.0));
        assert!(!registry.is_blocked(-1.0, 5.0, 0.0, 0.0));
        assert!(!registry.is_blocked(5.0, 11.0, 0.0, 0.0));
    }

    #[test]
    fn test_touching_edges_not_blocked() {
        let registry = ObstacleRegistry::new(vec![Obstacle::from_corners(0.0, 0.0, 10.0, 10.0)]);

        // Point sitting exactly on the edge
        assert!(!registry.is_blocked(0.0, 5.0, 0.0, 0.0));
        assert!(!registry.is_blocked(10.0, 10.0, 0.0, 0.0));

        // Footprint edge exactly on the obstacle edge
        assert!(!registry.is_blocked(-0.5, 5.0, 0.0, 0.5));
        assert!(registry.is_blocked(-0.49, 5.0, 0.0, 0.5));
    }

    #[test]
    fn test_radius_padding() {
        let registry = ObstacleRegistry::new(vec![Obstacle::from_corners(0.0, 0.0, 10.0, 10.0)]);

        assert!(!registry.is_blocked(-1.0, -1.0, 0.0, 0.9));
        // Square footprint: the corner overlaps even though a circle would not
        assert!(registry.is_blocked(-0.8, -0.8, 0.0, 0.9));
    }

    #[test]
    fn test_vertical_extent() {
        let registry = ObstacleRegistry::new(vec![
            Obstacle::from_corners(0.0, 0.0, 2.0, 2.0).with_vertical_extent(0.0, 1.5),
        ]);

        assert!(registry.is_blocked(1.0, 1.0, 0.0, 0.0));
        assert!(registry.is_blocked(1.0, 1.0, 1.5, 0.0));
        assert!(!registry.is_blocked(1.0, 1.0, 2.0, 0.0));
        assert!(!registry.is_blocked(1.0, 1.0, -0.1, 0.0));
    }

    #[test]
    fn test_from_slice() {
        let flat = Obstacle::from_slice(&[10.0, 10.0, 0.0, 0.0]).unwrap();
        assert_eq!(flat, Obstacle::from_corners(0.0, 0.0, 10.0, 10.0));
        assert!(flat.vertical.is_none());

        let boxed = Obstacle::from_slice(&[0.0, 0.0, 1.0, 1.0, 3.0, 1.0]).unwrap();
        assert_eq!(boxed.vertical, Some((1.0, 3.0)));

        assert!(Obstacle::from_slice(&[0.0, 0.0, 1.0]).is_none());
        assert!(Obstacle::from_slice(&[0.0, 0.0, 1.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_center() {
        let building = Obstacle::from_center(10.0, -8.0, 4.0, 5.0);
        assert_eq!(building.min_x, 6.0);
        assert_eq!(building.min_z, -13.0);
        assert_eq!(building.max_x, 14.0);
        assert_eq!(building.max_z, -3.0);
        assert_eq!(building.center(), (10.0, -8.0));
        assert!(building.contains_point(10.0, -7.5));
    }

    #[test]
    fn test_empty_registry_never_blocks() {
        let registry = ObstacleRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.is_blocked(0.0, 0.0, 0.0, 100.0));
    }
}
