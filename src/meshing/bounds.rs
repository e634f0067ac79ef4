use cgmath::{Point3, Vector3};

/// An axis-aligned bounding box, used by renderers for culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Aabb::new(first, first), |aabb, point| aabb.grow(point)))
    }

    fn grow(self, point: Point3<f32>) -> Self {
        Aabb {
            min: Point3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Point3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    /// The box moved by `offset`.
    pub fn translate(self, offset: Vector3<f32>) -> Self {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn union(self, other: Aabb) -> Self {
        self.grow(other.min).grow(other.max)
    }

    pub fn contains(&self, point: Point3<f32>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    /// Returns `true` if `other` lies entirely within this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}
