//! Axis-aligned collision for the block world
//!
//! The player is the only moving solid, so this stays small: box-vs-box
//! overlap, short-range box probes (the grounding and wall checks), and an
//! axis-separated clamped movement step that records contacts for the
//! per-tick response queue.

use glam::Vec2;

use super::level::Block;
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap; boxes that merely touch do not intersect. Resting
    /// contacts leave the collider exactly flush with a surface, and those
    /// must not read as penetration.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (amin, amax) = (self.min(), self.max());
        let (bmin, bmax) = (other.min(), other.max());
        amin.x < bmax.x && amax.x > bmin.x && amin.y < bmax.y && amax.y > bmin.y
    }

    /// The box covering this one swept by `delta`
    fn swept(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta * 0.5,
            half: self.half + delta.abs() * 0.5,
        }
    }
}

/// A clamped movement step against a solid; the normal points away from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec2,
}

/// Collision view over the current level: floor blocks plus the arena's two
/// side walls (vertical planes at x = 0 and x = SCREEN_WIDTH).
pub struct World<'a> {
    blocks: &'a [Block],
    left_wall: f32,
    right_wall: f32,
}

impl<'a> World<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self {
            blocks,
            left_wall: 0.0,
            right_wall: SCREEN_WIDTH,
        }
    }

    fn hits_wall(&self, aabb: &Aabb) -> bool {
        aabb.min().x < self.left_wall || aabb.max().x > self.right_wall
    }

    fn overlaps(&self, aabb: &Aabb) -> bool {
        self.hits_wall(aabb) || self.blocks.iter().any(|b| b.aabb().intersects(aabb))
    }

    /// Short-range box probe: sweep `aabb` by `dir * dist` and report whether
    /// anything solid lies in the swept volume.
    pub fn cast_box(&self, aabb: &Aabb, dir: Vec2, dist: f32) -> bool {
        self.overlaps(&aabb.swept(dir * dist))
    }
}

/// Move a collider by `vel * dt`, one axis at a time, clamping flush against
/// whatever it runs into. Vertical velocity is zeroed on floor and ceiling
/// contacts. Emits at most one contact per axis per call.
pub fn move_and_collide(
    pos: &mut Vec2,
    vel: &mut Vec2,
    offset: Vec2,
    half: Vec2,
    world: &World,
    dt: f32,
    contacts: &mut Vec<Contact>,
) {
    let dx = vel.x * dt;
    if dx != 0.0 {
        pos.x += dx;
        let bb = Aabb::new(*pos + offset, half);
        let mut edge = if dx > 0.0 {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
        for block in world.blocks {
            let solid = block.aabb();
            if solid.intersects(&bb) {
                edge = if dx > 0.0 {
                    edge.min(solid.min().x)
                } else {
                    edge.max(solid.max().x)
                };
            }
        }
        if dx > 0.0 && bb.max().x > world.right_wall {
            edge = edge.min(world.right_wall);
        }
        if dx < 0.0 && bb.min().x < world.left_wall {
            edge = edge.max(world.left_wall);
        }
        if edge.is_finite() {
            let center_x = if dx > 0.0 {
                edge - half.x
            } else {
                edge + half.x
            };
            pos.x = center_x - offset.x;
            let normal = Vec2::new(-dx.signum(), 0.0);
            contacts.push(Contact { normal });
        }
    }

    let dy = vel.y * dt;
    if dy != 0.0 {
        pos.y += dy;
        let bb = Aabb::new(*pos + offset, half);
        let mut edge = if dy > 0.0 {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
        for block in world.blocks {
            let solid = block.aabb();
            if solid.intersects(&bb) {
                edge = if dy > 0.0 {
                    edge.min(solid.min().y)
                } else {
                    edge.max(solid.max().y)
                };
            }
        }
        if edge.is_finite() {
            let center_y = if dy > 0.0 {
                edge - half.y
            } else {
                edge + half.y
            };
            pos.y = center_y - offset.y;
            vel.y = 0.0;
            let normal = Vec2::new(0.0, -dy.signum());
            contacts.push(Contact { normal });
        }
    }
}
