//! Collision detection and response
//!
//! Three resolvers run in a fixed order every frame: arena boundaries per
//! sphere, then every sphere pair in ascending index order, then the viewer
//! obstacle. Pairs are resolved one after another, not simultaneously, so a
//! later pair may nudge an earlier one back into slight overlap.

use glam::{Vec2, Vec3};

use super::state::Sphere;
use crate::consts::CONTACT_EPSILON;
use crate::settings::Settings;

/// Overlap between two spheres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first center toward the second
    pub normal: Vec3,
    /// How far the surfaces overlap along `normal`
    pub penetration: f32,
}

/// Check two spheres for overlap
///
/// Returns `None` when the spheres are apart, just touching, or their centers
/// are too close together to define a normal.
pub fn sphere_contact(
    first_center: Vec3,
    first_radius: f32,
    second_center: Vec3,
    second_radius: f32,
) -> Option<Contact> {
    let delta = second_center - first_center;
    let dist = delta.length();
    let min_dist = first_radius + second_radius;

    // Written as negated comparisons so NaN distances also bail out
    if !(dist < min_dist) || !(dist > CONTACT_EPSILON) {
        return None;
    }

    Some(Contact {
        normal: delta / dist,
        penetration: min_dist - dist,
    })
}

// === Arena boundaries ===

/// Keep every sphere between floor and ceiling and inside the cylinder wall
pub fn resolve_boundaries(spheres: &mut [Sphere], settings: &Settings) {
    for sphere in spheres.iter_mut() {
        resolve_floor_ceiling(sphere, settings);
        resolve_cylinder_wall(sphere, settings);
    }
}

/// Clamp a sphere between `min_y` and `max_y`, bouncing it vertically
pub fn resolve_floor_ceiling(sphere: &mut Sphere, settings: &Settings) {
    let clamped_y = if sphere.position.y - sphere.radius < settings.min_y {
        settings.min_y + sphere.radius
    } else if sphere.position.y + sphere.radius > settings.max_y {
        settings.max_y - sphere.radius
    } else {
        return;
    };

    sphere.position.y = clamped_y;
    sphere.velocity.y *= -settings.restitution;
    sphere.velocity.x *= settings.friction;
    sphere.velocity.z *= settings.friction;
}

/// Clamp a sphere inside the vertical cylinder around the Y axis
///
/// The outward part of the horizontal velocity is reflected; a sphere already
/// moving inward or tangentially only has its position corrected.
pub fn resolve_cylinder_wall(sphere: &mut Sphere, settings: &Settings) {
    let horizontal = Vec2::new(sphere.position.x, sphere.position.z);
    let dist = horizontal.length();
    let max_dist = settings.cylinder_radius - sphere.radius;

    if !(dist > max_dist) || !(dist > CONTACT_EPSILON) {
        return;
    }

    let normal = horizontal / dist;
    let clamped = normal * max_dist;
    sphere.position.x = clamped.x;
    sphere.position.z = clamped.y;

    let outward = Vec2::new(sphere.velocity.x, sphere.velocity.z).dot(normal);
    if !(outward > 0.0) {
        return;
    }

    let normal3 = Vec3::new(normal.x, 0.0, normal.y);
    sphere.velocity -= (1.0 + settings.restitution) * outward * normal3;
    sphere.velocity.x *= settings.friction;
    sphere.velocity.z *= settings.friction;
}

// === Sphere pairs ===

/// Resolve every unordered pair `(i, j)`, `i < j`, in ascending order
pub fn resolve_pairs(spheres: &mut [Sphere], restitution: f32) {
    let count = spheres.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = spheres.split_at_mut(j);
            resolve_pair(&mut head[i], &mut tail[0], restitution);
        }
    }
}

/// Separate two overlapping spheres and exchange impulses
///
/// Returns the contact that was resolved, if any.
pub fn resolve_pair(a: &mut Sphere, b: &mut Sphere, restitution: f32) -> Option<Contact> {
    let contact = sphere_contact(a.position, a.radius, b.position, b.radius)?;
    let Contact {
        normal,
        penetration,
    } = contact;

    let (m1, m2) = (a.mass, b.mass);
    let total_mass = m1 + m2;

    // Heavier sphere moves less
    a.position -= normal * (penetration * (m2 / total_mass));
    b.position += normal * (penetration * (m1 / total_mass));

    let rel_vel = b.velocity - a.velocity;
    let vel_along_normal = rel_vel.dot(normal);
    if !(vel_along_normal <= 0.0) {
        // Already separating
        return Some(contact);
    }

    let inv_mass_sum = 1.0 / m1 + 1.0 / m2;
    let j = -(1.0 + restitution) * vel_along_normal / inv_mass_sum;
    let impulse = j * normal;
    a.velocity -= impulse / m1;
    b.velocity += impulse / m2;

    let tangent = rel_vel - vel_along_normal * normal;
    if !(tangent.length_squared() > CONTACT_EPSILON) {
        return Some(contact);
    }
    let tangent = tangent.normalize();
    let jt = -rel_vel.dot(tangent) / inv_mass_sum;
    let friction_impulse = jt * tangent * (1.0 - restitution);
    a.velocity -= friction_impulse / m1;
    b.velocity += friction_impulse / m2;

    Some(contact)
}

// === Viewer obstacle ===

/// Push spheres out of the immovable viewer obstacle
///
/// The obstacle never moves in response and is not part of the store.
pub fn resolve_obstacle(
    spheres: &mut [Sphere],
    center: Vec3,
    radius: f32,
    restitution: f32,
    damping: f32,
) {
    for sphere in spheres.iter_mut() {
        let Some(Contact {
            normal,
            penetration,
        }) = sphere_contact(center, radius, sphere.position, sphere.radius)
        else {
            continue;
        };

        sphere.position += normal * penetration;

        let vel_along_normal = sphere.velocity.dot(normal);
        if !(vel_along_normal < 0.0) {
            continue;
        }
        sphere.velocity -= (1.0 + restitution) * vel_along_normal * normal;
        sphere.velocity *= damping;
    }
}
