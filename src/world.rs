use crate::ray::Ray;
use crate::coord::Coordinate;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::light::{ PointLight, lighting };
use crate::shape;
use crate::shape::ShapeArena;
use crate::intersect::{ Intersections, PrecomputedHit };

/// A world with shapes and light.
///
/// Worlds collect every shape (in a `ShapeArena`) as well as a light source.
/// Most of the shading logic is performed within worlds: shadow tests,
/// recursive reflection and refraction all live here. Rendering parameters
/// are threaded through every operation as a `RenderConfig` rather than read
/// from globals.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub shapes: ShapeArena,
    pub light: PointLight,
}

impl Default for World {
    fn default() -> World {
        World::empty()
    }
}

impl World {
    /// Creates an empty world with no shapes and the default light source.
    pub fn empty() -> World {
        World { shapes: ShapeArena::new(), light: Default::default() }
    }

    /// Intersects a ray against every root shape in the world.
    ///
    /// Grouped shapes are reached through their group; intersecting the
    /// group's children directly would apply their transforms twice.
    pub fn intersect<'a>(&'a self, r: &Ray, cfg: &RenderConfig)
        -> Intersections<'a> {
        let mut intersections = Intersections::new();
        for id in self.shapes.roots() {
            let mut is = shape::intersect(&self.shapes, id, r, cfg);
            intersections.intersections.append(&mut is.intersections);
        }

        intersections.sort();
        intersections
    }

    /// Determines whether a point is shadowed.
    ///
    /// A point is shadowed when an opaque shape sits between it and the
    /// light. Transparent shapes cast no shadow; without this, the light
    /// under a glass sphere would render as a dark blot instead of a bright
    /// spot. The shadow ray looks through transparent surfaces, so a glass
    /// pane in front of an opaque wall still leaves the point in the wall's
    /// shadow.
    pub fn is_shadowed(&self, p: Coordinate, cfg: &RenderConfig) -> bool {
        let v = self.light.position - p;
        let distance = v.magnitude();
        let direction = v.normalize();

        let r = Ray { origin: p, direction };
        let intersections = self.intersect(&r, cfg);

        intersections.intersections.iter()
            .filter(|i| i.t.is_finite() && i.t >= 0.0 && i.t < distance)
            .any(|i| {
                i.shape.material()
                    .map(|m| m.transparency == 0.0)
                    .unwrap_or(false)
            })
    }

    /// Calculates the color for a hit, based on shadows, light, and the
    /// reflective and refractive contributions of the surface.
    ///
    /// For surfaces that are both reflective and transparent, the two
    /// contributions are blended by the Schlick reflectance; otherwise they
    /// are simply summed.
    pub fn shade_hit(&self, comps: &PrecomputedHit, cfg: &RenderConfig,
        remaining: usize) -> Color {
        let material = match comps.shape.material() {
            Some(m) => m,
            None => return Color::black(),
        };

        let shadowed = self.is_shadowed(comps.over_point, cfg);
        let surface = lighting(material, &self.shapes, comps.shape.id(),
            &self.light, comps.over_point, comps.eyev, comps.normalv,
            shadowed);

        let reflected = self.reflected_color(comps, cfg, remaining);
        let refracted = self.refracted_color(comps, cfg, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = comps.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    /// Determines a color based on the intersection of a ray and the shapes.
    ///
    /// The `remaining` parameter bounds recursion: each reflection or
    /// refraction bounce decrements it, and at zero the contribution is
    /// black. A ray that hits nothing is black as well.
    pub fn color_at(&self, r: &Ray, cfg: &RenderConfig, remaining: usize)
        -> Color {
        let mut is = self.intersect(r, cfg);

        match is.hit() {
            None => Color::black(),
            Some(i) => {
                let comps = PrecomputedHit::new(r, &i, Some(&is),
                    &self.shapes, cfg);
                self.shade_hit(&comps, cfg, remaining)
            },
        }
    }

    /// The color contributed by the reflection at a hit.
    ///
    /// Non-reflective surfaces (and exhausted recursion) contribute black.
    /// The reflected ray starts at the over point; starting it on the
    /// surface itself would immediately re-intersect the same shape.
    pub fn reflected_color(&self, comps: &PrecomputedHit, cfg: &RenderConfig,
        remaining: usize) -> Color {
        if remaining == 0 {
            return Color::black();
        }

        let reflective = match comps.shape.material() {
            Some(m) => m.reflective,
            None => return Color::black(),
        };

        if reflective == 0.0 {
            return Color::black();
        }

        let reflect_ray = Ray {
            origin: comps.over_point,
            direction: comps.reflectv,
        };
        let color = self.color_at(&reflect_ray, cfg, remaining - 1);

        color * reflective
    }

    /// The color contributed by the refraction at a hit.
    ///
    /// Opaque surfaces (and exhausted recursion) contribute black, as does
    /// total internal reflection. The refracted ray direction follows
    /// Snell's law, and the ray starts at the under point, just inside the
    /// surface being entered.
    pub fn refracted_color(&self, comps: &PrecomputedHit, cfg: &RenderConfig,
        remaining: usize) -> Color {
        if remaining == 0 {
            return Color::black();
        }

        let transparency = match comps.shape.material() {
            Some(m) => m.transparency,
            None => return Color::black(),
        };

        if transparency == 0.0 {
            return Color::black();
        }

        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio.powi(2) * (1.0 - cos_i.powi(2));

        // Total internal reflection; all the light bounces back.
        if sin2_t > 1.0 {
            return Color::black();
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t)
                      - comps.eyev * n_ratio;

        let refract_ray = Ray {
            origin: comps.under_point,
            direction,
        };
        let color = self.color_at(&refract_ray, cfg, remaining - 1);

        color * transparency
    }
}

/* Tests */
