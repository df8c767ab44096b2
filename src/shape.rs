use std::ops::{ Index, IndexMut };

use crate::coord::Coordinate;
use crate::ray::Ray;
use crate::light::Material;
use crate::matrix::Matrix;
use crate::config::RenderConfig;
use crate::error::TraceError;
use crate::intersect::{ Intersection, Intersections };

/// An index into a `ShapeArena`.
///
/// Ids double as shape identity: two intersections refer to the same shape
/// exactly when their ids match.
pub type ShapeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// A plane spanning X and Z, with a normal pointing up along Y.
    Plane,

    /// A 1-by-1-by-1 cube with its center at the object-space origin.
    Cube,

    /// A cylinder of radius 1 around the Y axis, truncated at `minimum` and
    /// `maximum`, optionally capped.
    Cylinder { minimum: f64, maximum: f64, closed: bool },

    /// A double-napped cone around the Y axis, truncated at `minimum` and
    /// `maximum`, optionally capped.
    Cone { minimum: f64, maximum: f64, closed: bool },

    /// A group of shapes, referred to by arena id. Can include other groups.
    Group(Vec<ShapeId>),
}

/// A shape in a scene.
///
/// Shapes live in a `ShapeArena`; group membership is expressed with arena
/// ids rather than owned child shapes, so a deeply nested scene is still a
/// flat vector. The transform is validated on assignment and its inverse is
/// cached, which keeps the render path free of per-ray inversions.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,

    transform: Matrix,
    inverse_transform: Matrix,

    /// `None` for groups, which have no surface of their own.
    material: Option<Material>,

    id: ShapeId,
    parent: Option<ShapeId>,
}

/// Checks that two Shapes are equal.
///
/// Note that the `id` and `parent` fields are not checked for equality; two
/// equivalent shapes can live in different arenas.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.transform == other.transform
            && self.material == other.material
    }
}

impl Shape {
    fn with_kind(kind: ShapeKind) -> Shape {
        let material = match kind {
            ShapeKind::Group(_) => None,
            _ => Some(Default::default()),
        };

        Shape {
            kind,
            transform: Matrix::identity(4),
            inverse_transform: Matrix::identity(4),
            material,
            id: 0,
            parent: None,
        }
    }

    /// Creates a unit sphere with identity transform and default material.
    pub fn sphere() -> Shape {
        Shape::with_kind(ShapeKind::Sphere)
    }

    /// Creates a plane with a normal pointing up along the Y axis.
    pub fn plane() -> Shape {
        Shape::with_kind(ShapeKind::Plane)
    }

    /// Creates a unit cube with identity transform and default material.
    pub fn cube() -> Shape {
        Shape::with_kind(ShapeKind::Cube)
    }

    /// Creates an infinitely long cylinder with no end caps.
    pub fn cylinder() -> Shape {
        Shape::with_kind(ShapeKind::Cylinder {
            minimum: std::f64::NEG_INFINITY,
            maximum: std::f64::INFINITY,
            closed: false,
        })
    }

    /// Creates a bounded cylinder without caps.
    pub fn bounded_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::with_kind(ShapeKind::Cylinder { minimum, maximum, closed: false })
    }

    /// Creates a bounded cylinder with caps.
    pub fn capped_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::with_kind(ShapeKind::Cylinder { minimum, maximum, closed: true })
    }

    /// Creates an infinite double-napped cone with no end caps.
    pub fn cone() -> Shape {
        Shape::with_kind(ShapeKind::Cone {
            minimum: std::f64::NEG_INFINITY,
            maximum: std::f64::INFINITY,
            closed: false,
        })
    }

    /// Creates a bounded double-napped cone with no end caps.
    pub fn bounded_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::with_kind(ShapeKind::Cone { minimum, maximum, closed: false })
    }

    /// Creates a double-napped cone with end caps.
    pub fn capped_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::with_kind(ShapeKind::Cone { minimum, maximum, closed: true })
    }

    /// Creates a group, which holds ids of other shapes (possibly groups).
    pub fn group() -> Shape {
        Shape::with_kind(ShapeKind::Group(Vec::new()))
    }

    /// This shape's arena id. Meaningful once the shape has been added to a
    /// `ShapeArena`.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// The group this shape belongs to, if any.
    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    /// Returns a reference to the Shape transform.
    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    /// Returns a reference to the cached inverse of the Shape transform.
    pub fn inverse_transform(&self) -> &Matrix {
        &self.inverse_transform
    }

    /// Sets the transform property on a Shape.
    ///
    /// Only invertible 4x4 matrices are accepted; anything else produces an
    /// `InvalidTransform` error and leaves the shape unchanged. The inverse
    /// is computed once here and cached.
    pub fn set_transform(&mut self, transform: Matrix) -> Result<(), TraceError> {
        if transform.rows() != 4 || transform.cols() != 4 {
            return Err(TraceError::InvalidTransform);
        }

        let inverse = transform.inverse()
            .map_err(|_| TraceError::InvalidTransform)?;

        self.transform = transform;
        self.inverse_transform = inverse;
        Ok(())
    }

    /// Returns a reference to this Shape's material. Groups have none.
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Returns a mutable reference to this Shape's material. Groups have none.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.material.as_mut()
    }

    /// Replaces this Shape's material. Ignored for groups.
    pub fn set_material(&mut self, material: Material) {
        if self.material.is_some() {
            self.material = Some(material);
        }
    }

    /// Returns the ids of this shape's children if this is a group.
    pub fn children(&self) -> Option<&Vec<ShapeId>> {
        if let ShapeKind::Group(ref children) = self.kind {
            Some(children)
        } else {
            None
        }
    }
}

/// The flat storage for every shape in a scene.
///
/// Adding a shape assigns it an id; group structure is recorded by id in both
/// directions (the group lists its children, each child records its parent).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeArena {
    shapes: Vec<Shape>,
}

impl ShapeArena {
    pub fn new() -> ShapeArena {
        ShapeArena { shapes: Vec::new() }
    }

    /// Adds a shape to the arena, assigning and returning its id.
    pub fn add(&mut self, mut shape: Shape) -> ShapeId {
        let id = self.shapes.len();
        shape.id = id;
        self.shapes.push(shape);

        id
    }

    /// Registers `child` as a member of the group `group`.
    ///
    /// If `group` does not refer to a group shape, a `NotAGroup` error is
    /// returned and nothing changes.
    pub fn add_child(&mut self, group: ShapeId, child: ShapeId)
        -> Result<(), TraceError> {
        match self.shapes.get(group).map(|s| &s.kind) {
            Some(ShapeKind::Group(_)) => (),
            _ => return Err(TraceError::NotAGroup(group)),
        }

        self.shapes[child].parent = Some(group);
        if let ShapeKind::Group(ref mut children) = self.shapes[group].kind {
            children.push(child);
        }

        Ok(())
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Ids of shapes without a parent. These are the shapes a `World` casts
    /// rays against; grouped shapes are reached through their group.
    pub fn roots<'a>(&'a self) -> impl Iterator<Item = ShapeId> + 'a {
        self.shapes.iter()
            .filter(|s| s.parent.is_none())
            .map(|s| s.id)
    }
}

impl Index<ShapeId> for ShapeArena {
    type Output = Shape;

    fn index(&self, id: ShapeId) -> &Shape {
        &self.shapes[id]
    }
}

impl IndexMut<ShapeId> for ShapeArena {
    fn index_mut(&mut self, id: ShapeId) -> &mut Shape {
        &mut self.shapes[id]
    }
}

/// Intersects a ray with a shape in the arena.
///
/// The ray is converted from world space to the shape's object space with the
/// cached inverse transform before the shape-specific intersection routine
/// runs. Groups convert the ray into group space once, then defer to each
/// child; nested groups compound naturally through the recursion.
pub fn intersect<'a>(arena: &'a ShapeArena, id: ShapeId, ray: &Ray,
    cfg: &RenderConfig) -> Intersections<'a> {
    let shape = &arena[id];
    let local_ray = ray.transform(shape.inverse_transform());

    match shape.kind {
        ShapeKind::Group(ref children) => {
            let mut all = Vec::new();
            for &child in children.iter() {
                all.push(intersect(arena, child, &local_ray, cfg));
            }

            Intersections::aggregate(all)
        },
        _ => local_intersect(shape, &local_ray, cfg),
    }
}

/// Intersect an object-space ray with a non-group shape.
fn local_intersect<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig)
    -> Intersections<'a> {
    match shape.kind {
        ShapeKind::Sphere => intersect_sphere(shape, ray),
        ShapeKind::Plane => intersect_plane(shape, ray, cfg),
        ShapeKind::Cube => intersect_cube(shape, ray, cfg),
        ShapeKind::Cylinder { .. } => intersect_cylinder(shape, ray, cfg),
        ShapeKind::Cone { .. } => intersect_cone(shape, ray, cfg),
        ShapeKind::Group(_) => unreachable!("groups are intersected via their children"),
    }
}

/// Obtain the world-space normal vector of a shape at a world-space point.
pub fn normal_at(arena: &ShapeArena, id: ShapeId, world_point: Coordinate,
    cfg: &RenderConfig) -> Coordinate {
    let local_point = world_to_object(arena, id, world_point);
    let local_normal = local_normal_at(&arena[id], &local_point, cfg);

    normal_to_world(arena, id, local_normal)
}

/// Obtain the object-space normal vector of a non-group shape at an
/// object-space point.
pub fn local_normal_at(shape: &Shape, at: &Coordinate, cfg: &RenderConfig)
    -> Coordinate {
    match shape.kind {
        ShapeKind::Sphere => Coordinate { w: 0.0, ..*at },
        ShapeKind::Plane => Coordinate::vector(0.0, 1.0, 0.0),
        ShapeKind::Cube => normal_at_cube(at),
        ShapeKind::Cylinder { minimum, maximum, .. }
            => normal_at_cylinder(at, minimum, maximum, cfg),
        ShapeKind::Cone { minimum, maximum, .. }
            => normal_at_cone(at, minimum, maximum, cfg),
        ShapeKind::Group(_) => panic!(
            "local normal calculations should never occur on groups"
        ),
    }
}

/// Converts a point from world space to a shape's object space.
///
/// Grouped shapes convert through their ancestors first: the point passes
/// from world space into the outermost group's space, down through any
/// intermediate groups, and finally through this shape's own inverse
/// transform.
pub fn world_to_object(arena: &ShapeArena, id: ShapeId, point: Coordinate)
    -> Coordinate {
    let shape = &arena[id];
    let point = match shape.parent() {
        Some(parent) => world_to_object(arena, parent, point),
        None => point,
    };

    shape.inverse_transform() * point
}

/// Converts a normal from a shape's object space to world space.
///
/// The normal is transformed by the inverse transpose at each level (a plain
/// transform would skew normals under non-uniform scaling), renormalized, and
/// passed up through the shape's ancestors until it reaches world space.
pub fn normal_to_world(arena: &ShapeArena, id: ShapeId, normal: Coordinate)
    -> Coordinate {
    let shape = &arena[id];

    let mut normal = shape.inverse_transform().transposition() * normal;
    normal.w = 0.0;
    let normal = normal.normalize();

    match shape.parent() {
        Some(parent) => normal_to_world(arena, parent, normal),
        None => normal,
    }
}

/// Checks whether a ray intersects a sphere.
///
/// Can return two values: either an empty list (in the case of zero
/// intersections), or a two-element list (in the case of one or more
/// intersections). If the sphere is intersected at a tangent, the two
/// elements are equal.
fn intersect_sphere<'a>(shape: &'a Shape, ray: &Ray) -> Intersections<'a> {
    // Sphere is centered at the object-space origin.
    // Note that subtracting a point removes the 'w' part of the ray origin.
    let sphere_to_ray = ray.origin - Coordinate::point(0.0, 0.0, 0.0);

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

    let discriminant = b.powi(2) - (4.0 * a * c);

    if discriminant < 0.0 {
        return Intersections::new()
    }

    let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
    let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

    let i1 = Intersection::new(t1, shape);
    let i2 = Intersection::new(t2, shape);
    Intersections { intersections: vec![i1, i2] }
}

/// Intersects a ray with a plane.
fn intersect_plane<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig)
    -> Intersections<'a> {
    // In local space, without a Y component, the ray won't intersect.
    if ray.direction.y.abs() <= cfg.epsilon {
        return Intersections::new();
    }

    let t = -ray.origin.y / ray.direction.y;
    let i = Intersection::new(t, shape);

    Intersections { intersections: vec![i] }
}

fn intersect_cube<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig)
    -> Intersections<'a> {
    let (xtmin, xtmax)
        = check_cube_axis(ray.origin.x, ray.direction.x, cfg);
    let (ytmin, ytmax)
        = check_cube_axis(ray.origin.y, ray.direction.y, cfg);
    let (ztmin, ztmax)
        = check_cube_axis(ray.origin.z, ray.direction.z, cfg);

    let tmin = xtmin.max(ytmin).max(ztmin);
    let tmax = xtmax.min(ytmax).min(ztmax);

    // The ray misses when the per-axis intervals have no overlap.
    if tmin > tmax {
        return Intersections::new()
    }

    Intersections {
        intersections: vec![
            Intersection::new(tmin, shape),
            Intersection::new(tmax, shape)
        ]
    }
}

/// Gets the min and max intersection offsets along an axis of a cube.
///
/// No particular axis is specified; this function takes a component from
/// the `origin` and `direction` fields of a `Ray` (e.g. `origin.x` and
/// `direction.x`) and returns where the `Ray` intersects planes on a cube
/// for a single axis.
///
/// The smaller `t` is first in the tuple, the larger `t` is second.
///
/// Note that this calculation assumes that the current cube is a unit
/// cube centered at the object-space origin.
fn check_cube_axis(origin: f64, direction: f64, cfg: &RenderConfig)
    -> (f64, f64) {
    let tmin_numerator = -1.0 - origin;
    let tmax_numerator =  1.0 - origin;

    // Make sure that the direction is non-zero. If it is, assign INFINITY.
    let (tmin, tmax) = if direction.abs() >= cfg.epsilon {
        (tmin_numerator / direction, tmax_numerator / direction)
    } else {
        (tmin_numerator * std::f64::INFINITY,
         tmax_numerator * std::f64::INFINITY)
    };

    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

fn intersect_cylinder<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig)
    -> Intersections<'a> {
    let (minimum, maximum) = match shape.kind {
        ShapeKind::Cylinder { minimum, maximum, .. } => (minimum, maximum),
        _ => unreachable!(),
    };

    let a = ray.direction.x.powi(2) + ray.direction.z.powi(2);

    // If the ray is parallel to the Y axis, check caps (if present) and leave.
    if a < cfg.epsilon {
        let mut is = Intersections::new();
        intersect_cylinder_caps(shape, ray, cfg, &mut is);
        return is;
    }

    let b = 2.0f64 * ray.origin.x * ray.direction.x
          + 2.0f64 * ray.origin.z * ray.direction.z;

    let c = ray.origin.x.powi(2) + ray.origin.z.powi(2) - 1.0;

    let disc = b.powi(2) - 4.0 * a * c;

    // The ray does not intersect the cylinder.
    if disc < 0.0 {
        return Intersections::new();
    }

    // The ray intersects the cylinder at one or two points.
    let mut t0 = (-b - (disc.sqrt())) / (2.0 * a);
    let mut t1 = (-b + (disc.sqrt())) / (2.0 * a);

    // Make sure that t0 is the lowest intersection location.
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    let mut is = Intersections::new();

    // If the t0 intersection is within the cylinder's bounds, add it.
    let y0 = ray.origin.y + t0 * ray.direction.y;
    if minimum < y0 && y0 < maximum {
        is.intersections.push(Intersection::new(t0, shape));
    }

    // If the t1 intersection is within the cylinder's bounds, add it.
    let y1 = ray.origin.y + t1 * ray.direction.y;
    if minimum < y1 && y1 < maximum {
        is.intersections.push(Intersection::new(t1, shape));
    }

    // Check whether any intersections occur at the cylinder caps.
    intersect_cylinder_caps(shape, ray, cfg, &mut is);

    is
}

fn intersect_cylinder_caps<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig,
    is: &mut Intersections<'a>) {
    let (minimum, maximum, closed) = match shape.kind {
        ShapeKind::Cylinder { minimum, maximum, closed }
            => (minimum, maximum, closed),
        _ => unreachable!(),
    };

    // If not closed, or the ray doesn't point anywhere near y, ignore caps.
    if !closed || ray.direction.y.abs() < cfg.epsilon {
        return;
    }

    // Check for an intersection with the lower end cap.
    let tl = (minimum - ray.origin.y) / ray.direction.y;
    if check_cylinder_cap(ray, tl) {
        is.intersections.push(Intersection::new(tl, shape));
    }

    // Check for an intersection with the upper end cap.
    let tu = (maximum - ray.origin.y) / ray.direction.y;
    if check_cylinder_cap(ray, tu) {
        is.intersections.push(Intersection::new(tu, shape));
    }
}

/// Checks to see if the intersection `t` is within a radius of 1 (the
/// assumed radius of a cylinder) from the Y axis.
fn check_cylinder_cap(ray: &Ray, t: f64) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;

    (x.powi(2) + z.powi(2)) <= 1.0
}

fn normal_at_cylinder(at: &Coordinate, minimum: f64, maximum: f64,
    cfg: &RenderConfig) -> Coordinate {
    // Calculate the square of the distance from the y axis.
    let dist = at.x.powi(2) + at.z.powi(2);

    // If on the top cap, return a normal pointing up.
    if dist < 1.0 && at.y >= maximum - cfg.epsilon {
        Coordinate::vector(0.0, 1.0, 0.0)
    }
    // If on the bottom cap, return a normal pointing down.
    else if dist < 1.0 && at.y <= minimum + cfg.epsilon {
        Coordinate::vector(0.0, -1.0, 0.0)
    }
    // If on the round surface, return a normal pointing outwards.
    else {
        Coordinate::vector(at.x, 0.0, at.z)
    }
}

fn intersect_cone<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig)
    -> Intersections<'a> {
    let (minimum, maximum) = match shape.kind {
        ShapeKind::Cone { minimum, maximum, .. } => (minimum, maximum),
        _ => unreachable!(),
    };

    let a = ray.direction.x.powi(2)
          - ray.direction.y.powi(2)
          + ray.direction.z.powi(2);

    let b = 2.0f64 * ray.origin.x * ray.direction.x
          - 2.0f64 * ray.origin.y * ray.direction.y
          + 2.0f64 * ray.origin.z * ray.direction.z;

    let c = ray.origin.x.powi(2)
          - ray.origin.y.powi(2)
          + ray.origin.z.powi(2);

    if a.abs() < cfg.epsilon {
        let mut is = Intersections::new();
        intersect_cone_caps(shape, ray, cfg, &mut is);

        // The ray misses when both a and b are 0.
        if b.abs() < cfg.epsilon {
            return is;
        }

        // If only a is 0, the ray is parallel to one half of the cone and
        // crosses the other half at the single root of b*t + c = 0.
        let t = -c / b;
        is.intersections.push(Intersection::new(t, shape));
        return is;
    }

    let disc = b.powi(2) - 4.0 * a * c;

    // The ray does not intersect the cone.
    if disc < 0.0 {
        return Intersections::new();
    }

    // The ray intersects the cone at one or two points.
    let mut t0 = (-b - (disc.sqrt())) / (2.0 * a);
    let mut t1 = (-b + (disc.sqrt())) / (2.0 * a);

    // Make sure that t0 is the lowest intersection location.
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    let mut is = Intersections::new();

    // If the t0 intersection is within the cone's bounds, add it.
    let y0 = ray.origin.y + t0 * ray.direction.y;
    if minimum < y0 && y0 < maximum {
        is.intersections.push(Intersection::new(t0, shape));
    }

    // If the t1 intersection is within the cone's bounds, add it.
    let y1 = ray.origin.y + t1 * ray.direction.y;
    if minimum < y1 && y1 < maximum {
        is.intersections.push(Intersection::new(t1, shape));
    }

    // Check whether any intersections occur at the cone caps.
    intersect_cone_caps(shape, ray, cfg, &mut is);

    is
}

fn intersect_cone_caps<'a>(shape: &'a Shape, ray: &Ray, cfg: &RenderConfig,
    is: &mut Intersections<'a>) {
    let (minimum, maximum, closed) = match shape.kind {
        ShapeKind::Cone { minimum, maximum, closed }
            => (minimum, maximum, closed),
        _ => unreachable!(),
    };

    // If not closed, or the ray doesn't point anywhere near y, ignore caps.
    if !closed || ray.direction.y.abs() < cfg.epsilon {
        return;
    }

    // Check for an intersection with the lower end cap.
    let tl = (minimum - ray.origin.y) / ray.direction.y;
    if check_cone_cap(ray, tl, minimum) {
        is.intersections.push(Intersection::new(tl, shape));
    }

    // Check for an intersection with the upper end cap.
    let tu = (maximum - ray.origin.y) / ray.direction.y;
    if check_cone_cap(ray, tu, maximum) {
        is.intersections.push(Intersection::new(tu, shape));
    }
}

/// Checks to see if the intersection `t` is within the cap radius, which for
/// a cone grows with the cap's distance `y` from the apex.
fn check_cone_cap(ray: &Ray, t: f64, y: f64) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;

    x.powi(2) + z.powi(2) <= y.powi(2)
}

fn normal_at_cone(at: &Coordinate, minimum: f64, maximum: f64,
    cfg: &RenderConfig) -> Coordinate {
    // Calculate the square of the distance from the y axis. The cap disk has
    // radius |y|, matching the cap intersection test.
    let dist = at.x.powi(2) + at.z.powi(2);

    // If on the top cap, return a normal pointing up.
    if dist < at.y.powi(2) && at.y >= maximum - cfg.epsilon {
        Coordinate::vector(0.0, 1.0, 0.0)
    }
    // If on the bottom cap, return a normal pointing down.
    else if dist < at.y.powi(2) && at.y <= minimum + cfg.epsilon {
        Coordinate::vector(0.0, -1.0, 0.0)
    }
    // If on the slanted surface, the Y component mirrors the distance from
    // the axis, pointing away from the apex.
    else {
        let mut y = dist.sqrt();
        if at.y > 0.0 {
            y = -y;
        }

        Coordinate::vector(at.x, y, at.z)
    }
}

fn normal_at_cube(p: &Coordinate) -> Coordinate {
    let xa = p.x.abs();
    let ya = p.y.abs();
    let za = p.z.abs();

    let max_component = xa.max(ya).max(za);
    if max_component == xa {
        Coordinate::vector(p.x, 0.0, 0.0)
    } else if max_component == ya {
        Coordinate::vector(0.0, p.y, 0.0)
    } else {
        Coordinate::vector(0.0, 0.0, p.z)
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feq;

    fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray {
        Ray::new(
            Coordinate::point(origin.0, origin.1, origin.2),
            Coordinate::vector(direction.0, direction.1, direction.2)
        ).unwrap()
    }

    #[test]
    fn sphere_two_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        let is = intersect(&arena, s, &ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 2);
        assert_eq!(is.intersections[0].t, 4.0);
        assert_eq!(is.intersections[1].t, 6.0);
    }

    #[test]
    fn sphere_tangent() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        let is = intersect(&arena, s, &ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 2);
        assert_eq!(is.intersections[0].t, 5.0);
        assert_eq!(is.intersections[1].t, 5.0);
    }

    #[test]
    fn sphere_miss() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        let is = intersect(&arena, s, &ray((0.0, 2.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert!(is.is_empty());
    }

    #[test]
    fn sphere_ray_inside() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        let is = intersect(&arena, s, &ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 2);
        assert_eq!(is.intersections[0].t, -1.0);
        assert_eq!(is.intersections[1].t, 1.0);
    }

    #[test]
    fn sphere_behind_ray() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        let is = intersect(&arena, s, &ray((0.0, 0.0, 5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 2);
        assert_eq!(is.intersections[0].t, -6.0);
        assert_eq!(is.intersections[1].t, -4.0);
    }

    #[test]
    fn scaled_sphere_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let mut s = Shape::sphere();
        s.set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();
        let s = arena.add(s);

        let is = intersect(&arena, s, &ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 2);
        assert_eq!(is.intersections[0].t, 3.0);
        assert_eq!(is.intersections[1].t, 7.0);
    }

    #[test]
    fn translated_sphere_miss() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let mut s = Shape::sphere();
        s.set_transform(Matrix::translation(5.0, 0.0, 0.0)).unwrap();
        let s = arena.add(s);

        let is = intersect(&arena, s, &ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert!(is.is_empty());
    }

    #[test]
    fn sphere_normals() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());

        assert_eq!(normal_at(&arena, s, Coordinate::point(1.0, 0.0, 0.0), &cfg),
            Coordinate::vector(1.0, 0.0, 0.0));
        assert_eq!(normal_at(&arena, s, Coordinate::point(0.0, 1.0, 0.0), &cfg),
            Coordinate::vector(0.0, 1.0, 0.0));

        let sq3 = 3.0f64.sqrt() / 3.0;
        let n = normal_at(&arena, s, Coordinate::point(sq3, sq3, sq3), &cfg);
        assert_eq!(n, Coordinate::vector(sq3, sq3, sq3));
        assert_eq!(n, n.normalize());
    }

    #[test]
    fn translated_sphere_normal() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let mut s = Shape::sphere();
        s.set_transform(Matrix::translation(0.0, 1.0, 0.0)).unwrap();
        let s = arena.add(s);

        let n = normal_at(&arena, s,
            Coordinate::point(0.0, 1.70711, -0.70711), &cfg);
        assert_eq!(n, Coordinate::vector(0.0, 0.70711, -0.70711));
    }

    #[test]
    fn transformed_sphere_normal() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let mut s = Shape::sphere();
        let m = Matrix::compose(&[
            Matrix::scaling(1.0, 0.5, 1.0),
            Matrix::rotation_z(std::f64::consts::PI / 5.0),
        ]).unwrap();
        s.set_transform(m).unwrap();
        let s = arena.add(s);

        let sq2 = 2.0f64.sqrt() / 2.0;
        let n = normal_at(&arena, s, Coordinate::point(0.0, sq2, -sq2), &cfg);
        assert_eq!(n, Coordinate::vector(0.0, 0.97014, -0.24254));
    }

    #[test]
    fn set_transform_rejects_singular() {
        let mut s = Shape::sphere();
        let res = s.set_transform(Matrix::scaling(0.0, 0.0, 0.0));

        assert_eq!(res, Err(TraceError::InvalidTransform));
        assert_eq!(*s.transform(), Matrix::identity(4));
    }

    #[test]
    fn set_transform_rejects_wrong_dimensions() {
        let mut s = Shape::sphere();
        let res = s.set_transform(Matrix::identity(3));

        assert_eq!(res, Err(TraceError::InvalidTransform));
    }

    #[test]
    fn plane_parallel_ray_misses() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let p = arena.add(Shape::plane());

        let is = intersect(&arena, p, &ray((0.0, 10.0, 0.0), (0.0, 0.0, 1.0)),
            &cfg);
        assert!(is.is_empty());

        // Coplanar rays also produce no intersections.
        let is = intersect(&arena, p, &ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)),
            &cfg);
        assert!(is.is_empty());
    }

    #[test]
    fn plane_hit_from_above_and_below() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let p = arena.add(Shape::plane());

        let is = intersect(&arena, p, &ray((0.0, 1.0, 0.0), (0.0, -1.0, 0.0)),
            &cfg);
        assert_eq!(is.len(), 1);
        assert_eq!(is.intersections[0].t, 1.0);

        let is = intersect(&arena, p, &ray((0.0, -1.0, 0.0), (0.0, 1.0, 0.0)),
            &cfg);
        assert_eq!(is.len(), 1);
        assert_eq!(is.intersections[0].t, 1.0);
    }

    #[test]
    fn plane_normal_is_constant() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let p = arena.add(Shape::plane());

        let up = Coordinate::vector(0.0, 1.0, 0.0);
        assert_eq!(normal_at(&arena, p,
            Coordinate::point(0.0, 0.0, 0.0), &cfg), up);
        assert_eq!(normal_at(&arena, p,
            Coordinate::point(10.0, 0.0, -10.0), &cfg), up);
        assert_eq!(normal_at(&arena, p,
            Coordinate::point(-5.0, 0.0, 150.0), &cfg), up);
    }

    #[test]
    fn cube_hits() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cube());

        let cases = [
            ((5.0, 0.5, 0.0), (-1.0, 0.0, 0.0), 4.0, 6.0),
            ((-5.0, 0.5, 0.0), (1.0, 0.0, 0.0), 4.0, 6.0),
            ((0.5, 5.0, 0.0), (0.0, -1.0, 0.0), 4.0, 6.0),
            ((0.5, -5.0, 0.0), (0.0, 1.0, 0.0), 4.0, 6.0),
            ((0.5, 0.0, 5.0), (0.0, 0.0, -1.0), 4.0, 6.0),
            ((0.5, 0.0, -5.0), (0.0, 0.0, 1.0), 4.0, 6.0),
            ((0.0, 0.5, 0.0), (0.0, 0.0, 1.0), -1.0, 1.0),
        ];

        for (origin, direction, t1, t2) in cases.iter() {
            let is = intersect(&arena, c, &ray(*origin, *direction), &cfg);
            assert_eq!(is.len(), 2);
            assert_eq!(is.intersections[0].t, *t1);
            assert_eq!(is.intersections[1].t, *t2);
        }
    }

    #[test]
    fn cube_misses() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cube());

        let cases = [
            ((-2.0, 0.0, 0.0), (0.2673, 0.5345, 0.8018)),
            ((0.0, -2.0, 0.0), (0.8018, 0.2673, 0.5345)),
            ((0.0, 0.0, -2.0), (0.5345, 0.8018, 0.2673)),
            ((2.0, 0.0, 2.0), (0.0, 0.0, -1.0)),
            ((0.0, 2.0, 2.0), (0.0, -1.0, 0.0)),
            ((2.0, 2.0, 0.0), (-1.0, 0.0, 0.0)),
        ];

        for (origin, direction) in cases.iter() {
            let is = intersect(&arena, c, &ray(*origin, *direction), &cfg);
            assert!(is.is_empty());
        }
    }

    #[test]
    fn cube_normals() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cube());

        let cases = [
            ((1.0, 0.5, -0.8), (1.0, 0.0, 0.0)),
            ((-1.0, -0.2, 0.9), (-1.0, 0.0, 0.0)),
            ((-0.4, 1.0, -0.1), (0.0, 1.0, 0.0)),
            ((0.3, -1.0, -0.7), (0.0, -1.0, 0.0)),
            ((-0.6, 0.3, 1.0), (0.0, 0.0, 1.0)),
            ((0.4, 0.4, -1.0), (0.0, 0.0, -1.0)),
            ((1.0, 1.0, 1.0), (1.0, 0.0, 0.0)),
            ((-1.0, -1.0, -1.0), (-1.0, 0.0, 0.0)),
        ];

        for (point, normal) in cases.iter() {
            let n = normal_at(&arena, c,
                Coordinate::point(point.0, point.1, point.2), &cfg);
            assert_eq!(n, Coordinate::vector(normal.0, normal.1, normal.2));
        }
    }

    #[test]
    fn cylinder_misses() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cylinder());

        let cases = [
            ((1.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
            ((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
            ((0.0, 0.0, -5.0), (1.0, 1.0, 1.0)),
        ];

        for (origin, direction) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            assert!(intersect(&arena, c, &r, &cfg).is_empty());
        }
    }

    #[test]
    fn cylinder_hits() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cylinder());

        let cases = [
            ((1.0, 0.0, -5.0), (0.0, 0.0, 1.0), 5.0, 5.0),
            ((0.0, 0.0, -5.0), (0.0, 0.0, 1.0), 4.0, 6.0),
            ((0.5, 0.0, -5.0), (0.1, 1.0, 1.0), 6.80798, 7.08872),
        ];

        for (origin, direction, t1, t2) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            let is = intersect(&arena, c, &r, &cfg);
            assert_eq!(is.len(), 2);
            assert!(feq(is.intersections[0].t, *t1));
            assert!(feq(is.intersections[1].t, *t2));
        }
    }

    #[test]
    fn cylinder_normals() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cylinder());

        let cases = [
            ((1.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
            ((0.0, 5.0, -1.0), (0.0, 0.0, -1.0)),
            ((0.0, -2.0, 1.0), (0.0, 0.0, 1.0)),
            ((-1.0, 1.0, 0.0), (-1.0, 0.0, 0.0)),
        ];

        for (point, normal) in cases.iter() {
            let n = normal_at(&arena, c,
                Coordinate::point(point.0, point.1, point.2), &cfg);
            assert_eq!(n, Coordinate::vector(normal.0, normal.1, normal.2));
        }
    }

    #[test]
    fn truncated_cylinder_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::bounded_cylinder(1.0, 2.0));

        let cases = [
            ((0.0, 1.5, 0.0), (0.1, 1.0, 0.0), 0),
            ((0.0, 3.0, -5.0), (0.0, 0.0, 1.0), 0),
            ((0.0, 0.0, -5.0), (0.0, 0.0, 1.0), 0),
            ((0.0, 2.0, -5.0), (0.0, 0.0, 1.0), 0),
            ((0.0, 1.0, -5.0), (0.0, 0.0, 1.0), 0),
            ((0.0, 1.5, -2.0), (0.0, 0.0, 1.0), 2),
        ];

        for (origin, direction, count) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            assert_eq!(intersect(&arena, c, &r, &cfg).len(), *count);
        }
    }

    #[test]
    fn capped_cylinder_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::capped_cylinder(1.0, 2.0));

        let cases = [
            ((0.0, 3.0, 0.0), (0.0, -1.0, 0.0), 2),
            ((0.0, 3.0, -2.0), (0.0, -1.0, 2.0), 2),
            ((0.0, 4.0, -2.0), (0.0, -1.0, 1.0), 2),
            ((0.0, 0.0, -2.0), (0.0, 1.0, 2.0), 2),
            ((0.0, -1.0, -2.0), (0.0, 1.0, 1.0), 2),
        ];

        for (origin, direction, count) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            assert_eq!(intersect(&arena, c, &r, &cfg).len(), *count);
        }
    }

    #[test]
    fn capped_cylinder_cap_normals() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::capped_cylinder(1.0, 2.0));

        let cases = [
            ((0.0, 1.0, 0.0), (0.0, -1.0, 0.0)),
            ((0.5, 1.0, 0.0), (0.0, -1.0, 0.0)),
            ((0.0, 1.0, 0.5), (0.0, -1.0, 0.0)),
            ((0.0, 2.0, 0.0), (0.0, 1.0, 0.0)),
            ((0.5, 2.0, 0.0), (0.0, 1.0, 0.0)),
            ((0.0, 2.0, 0.5), (0.0, 1.0, 0.0)),
        ];

        for (point, normal) in cases.iter() {
            let n = normal_at(&arena, c,
                Coordinate::point(point.0, point.1, point.2), &cfg);
            assert_eq!(n, Coordinate::vector(normal.0, normal.1, normal.2));
        }
    }

    #[test]
    fn cone_hits() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cone());

        let cases = [
            ((0.0, 0.0, -5.0), (0.0, 0.0, 1.0), 5.0, 5.0),
            ((0.0, 0.0, -5.0), (1.0, 1.0, 1.0), 8.66025, 8.66025),
            ((1.0, 1.0, -5.0), (-0.5, -1.0, 1.0), 4.55006, 49.44994),
        ];

        for (origin, direction, t1, t2) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            let is = intersect(&arena, c, &r, &cfg);
            assert_eq!(is.len(), 2);
            assert!(feq(is.intersections[0].t, *t1));
            assert!(feq(is.intersections[1].t, *t2));
        }
    }

    #[test]
    fn cone_parallel_to_one_half() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::cone());

        let direction = Coordinate::vector(0.0, 1.0, 1.0).normalize();
        let r = Ray::new(Coordinate::point(0.0, 0.0, -1.0), direction).unwrap();

        let is = intersect(&arena, c, &r, &cfg);
        assert_eq!(is.len(), 1);
        assert!(feq(is.intersections[0].t, 0.70711));

        // The hit must land on the cone surface: x^2 + z^2 = y^2.
        let p = r.position(is.intersections[0].t);
        assert!(feq(p.x.powi(2) + p.z.powi(2), p.y.powi(2)));
    }

    #[test]
    fn capped_cone_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let c = arena.add(Shape::capped_cone(-0.5, 0.5));

        let cases = [
            ((0.0, 0.0, -5.0), (0.0, 1.0, 0.0), 0),
            ((0.0, 0.0, -0.25), (0.0, 1.0, 1.0), 2),
            ((0.0, 0.0, -0.25), (0.0, 1.0, 0.0), 4),
        ];

        for (origin, direction, count) in cases.iter() {
            let direction = Coordinate::vector(
                direction.0, direction.1, direction.2
            ).normalize();
            let r = Ray::new(
                Coordinate::point(origin.0, origin.1, origin.2), direction
            ).unwrap();

            assert_eq!(intersect(&arena, c, &r, &cfg).len(), *count);
        }
    }

    #[test]
    fn cone_local_normals() {
        let cfg: RenderConfig = Default::default();
        let c = Shape::cone();

        let sq2 = 2.0f64.sqrt();
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(0.0, 0.0, 0.0), &cfg),
            Coordinate::vector(0.0, 0.0, 0.0)
        );
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(1.0, 1.0, 1.0), &cfg),
            Coordinate::vector(1.0, -sq2, 1.0)
        );
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(-1.0, -1.0, 0.0), &cfg),
            Coordinate::vector(-1.0, 1.0, 0.0)
        );
    }

    #[test]
    fn cone_cap_normals_use_cap_radius() {
        let cfg: RenderConfig = Default::default();
        let c = Shape::capped_cone(-2.0, 2.0);

        // Cap disks grow with |y|; points beyond radius 1 are still caps.
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(1.5, 2.0, 0.0), &cfg),
            Coordinate::vector(0.0, 1.0, 0.0)
        );
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(0.0, -2.0, 1.5), &cfg),
            Coordinate::vector(0.0, -1.0, 0.0)
        );

        // A point on the cap's rim belongs to the slant, not the cap.
        assert_eq!(
            local_normal_at(&c, &Coordinate::point(2.0, 2.0, 0.0), &cfg),
            Coordinate::vector(2.0, -2.0, 0.0)
        );
    }

    #[test]
    fn add_child_rejects_non_group() {
        let mut arena = ShapeArena::new();
        let s = arena.add(Shape::sphere());
        let child = arena.add(Shape::sphere());

        assert_eq!(arena.add_child(s, child), Err(TraceError::NotAGroup(s)));
        assert_eq!(arena[child].parent(), None);
    }

    #[test]
    fn add_child_sets_parent() {
        let mut arena = ShapeArena::new();
        let g = arena.add(Shape::group());
        let s = arena.add(Shape::sphere());

        arena.add_child(g, s).unwrap();

        assert_eq!(arena[s].parent(), Some(g));
        assert_eq!(arena[g].children(), Some(&vec![s]));
        assert_eq!(arena.roots().collect::<Vec<_>>(), vec![g]);
    }

    #[test]
    fn empty_group_no_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let g = arena.add(Shape::group());

        let is = intersect(&arena, g, &ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)),
            &cfg);
        assert!(is.is_empty());
    }

    #[test]
    fn group_intersections_are_sorted() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();
        let g = arena.add(Shape::group());

        let s1 = arena.add(Shape::sphere());

        let mut s2 = Shape::sphere();
        s2.set_transform(Matrix::translation(0.0, 0.0, -3.0)).unwrap();
        let s2 = arena.add(s2);

        let mut s3 = Shape::sphere();
        s3.set_transform(Matrix::translation(5.0, 0.0, 0.0)).unwrap();
        let s3 = arena.add(s3);

        arena.add_child(g, s1).unwrap();
        arena.add_child(g, s2).unwrap();
        arena.add_child(g, s3).unwrap();

        let is = intersect(&arena, g, &ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0)),
            &cfg);

        assert_eq!(is.len(), 4);
        assert_eq!(is.intersections[0].shape.id(), s2);
        assert_eq!(is.intersections[1].shape.id(), s2);
        assert_eq!(is.intersections[2].shape.id(), s1);
        assert_eq!(is.intersections[3].shape.id(), s1);
    }

    #[test]
    fn transformed_group_intersections() {
        let cfg: RenderConfig = Default::default();
        let mut arena = ShapeArena::new();

        let mut g = Shape::group();
        g.set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();
        let g = arena.add(g);

        let mut s = Shape::sphere();
        s.set_transform(Matrix::translation(5.0, 0.0, 0.0)).unwrap();
        let s = arena.add(s);

        arena.add_child(g, s).unwrap();

        let is = intersect(&arena, g, &ray((10.0, 0.0, -10.0), (0.0, 0.0, 1.0)),
            &cfg);
        assert_eq!(is.len(), 2);
    }

    fn nested_group_arena(inner_scale: Matrix)
        -> (ShapeArena, ShapeId) {
        let mut arena = ShapeArena::new();

        let mut g1 = Shape::group();
        g1.set_transform(Matrix::rotation_y(std::f64::consts::PI / 2.0))
            .unwrap();
        let g1 = arena.add(g1);

        let mut g2 = Shape::group();
        g2.set_transform(inner_scale).unwrap();
        let g2 = arena.add(g2);

        let mut s = Shape::sphere();
        s.set_transform(Matrix::translation(5.0, 0.0, 0.0)).unwrap();
        let s = arena.add(s);

        arena.add_child(g1, g2).unwrap();
        arena.add_child(g2, s).unwrap();

        (arena, s)
    }

    #[test]
    fn world_to_object_through_groups() {
        let (arena, s) = nested_group_arena(Matrix::scaling(2.0, 2.0, 2.0));

        let p = world_to_object(&arena, s, Coordinate::point(-2.0, 0.0, -10.0));
        assert_eq!(p, Coordinate::point(0.0, 0.0, -1.0));
    }

    #[test]
    fn normal_to_world_through_groups() {
        let (arena, s) = nested_group_arena(Matrix::scaling(1.0, 2.0, 3.0));

        let sq3 = 3.0f64.sqrt() / 3.0;
        let n = normal_to_world(&arena, s, Coordinate::vector(sq3, sq3, sq3));
        assert_eq!(n, Coordinate::vector(0.28571, 0.42857, -0.85714));
    }

    #[test]
    fn normal_at_on_grouped_child() {
        let cfg: RenderConfig = Default::default();
        let (arena, s) = nested_group_arena(Matrix::scaling(1.0, 2.0, 3.0));

        let n = normal_at(&arena, s,
            Coordinate::point(1.7321, 1.1547, -5.5774), &cfg);
        assert_eq!(n, Coordinate::vector(0.2857, 0.4286, -0.8571));
    }

    #[test]
    fn grouping_matches_composed_transform() {
        // A shape nested in transformed groups intersects exactly like an
        // ungrouped shape carrying the full composed transform.
        let cfg: RenderConfig = Default::default();
        let (arena, _) = nested_group_arena(Matrix::scaling(2.0, 2.0, 2.0));

        let mut flat_arena = ShapeArena::new();
        let mut flat = Shape::sphere();
        flat.set_transform(Matrix::compose(&[
            Matrix::rotation_y(std::f64::consts::PI / 2.0),
            Matrix::scaling(2.0, 2.0, 2.0),
            Matrix::translation(5.0, 0.0, 0.0),
        ]).unwrap()).unwrap();
        let flat = flat_arena.add(flat);

        let r = ray((-2.0, 0.0, -10.0), (0.0, 0.0, 1.0));
        let root = arena.roots().next().unwrap();
        let grouped = intersect(&arena, root, &r, &cfg);
        let composed = intersect(&flat_arena, flat, &r, &cfg);

        assert_eq!(grouped.len(), composed.len());
        for (a, b) in grouped.intersections.iter()
            .zip(composed.intersections.iter()) {
            assert!(feq(a.t, b.t));
        }
    }
}
