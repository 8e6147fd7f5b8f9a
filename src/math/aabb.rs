use glam::Vec3;

/// Axis-aligned bounding box.
///
/// An empty box (no points folded in yet) has `min = +inf` and `max = -inf`,
/// so folding the first point yields a zero-sized box at that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight bounds of a point set, accumulated in a single linear pass.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        points.into_iter().fold(Self::EMPTY, |acc, p| acc.grow(p))
    }

    pub fn grow(&self, point: Vec3) -> AABB {
        AABB {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Smallest extent component.
    pub fn min_extent(&self) -> f32 {
        self.extent().min_element()
    }

    /// Largest extent component.
    pub fn max_extent(&self) -> f32 {
        self.extent().max_element()
    }

    pub fn surface_area(&self) -> f32 {
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_center() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_extents() {
        let aabb = AABB::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 2.5));
        assert_eq!(aabb.extent(), Vec3::new(2.0, 3.0, 0.5));
        assert_eq!(aabb.min_extent(), 0.5);
        assert_eq!(aabb.max_extent(), 3.0);
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = AABB::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 7.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-3.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 7.0));
    }

    #[test]
    fn test_aabb_single_point_is_degenerate() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let aabb = AABB::from_points([p]);
        assert_eq!(aabb.min, p);
        assert_eq!(aabb.max, p);
        assert_eq!(aabb.max_extent(), 0.0);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_aabb_empty() {
        assert!(AABB::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_aabb_surface_area_rectangular() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0));
        // 2*(2*3 + 3*4 + 4*2) = 52
        assert!((aabb.surface_area() - 52.0).abs() < 0.01);
    }

    #[test]
    fn test_aabb_union_overlapping() {
        let a = AABB::new(Vec3::ZERO, Vec3::splat(2.0));
        let b = AABB::new(Vec3::ONE, Vec3::splat(3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }
}
