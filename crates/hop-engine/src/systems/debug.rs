//! Debug overlay data: the probe rays cast during an object's last step.
//!
//! Rays are stored as plain `#[repr(C)]` segments so a renderer can upload
//! them as-is (see [`RayLog::as_bytes`]).

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Which probe cast a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RayKind {
    Floor = 0,
    Ceiling = 1,
    Wall = 2,
    Lava = 3,
    Ledge = 4,
}

/// One probe ray as a line segment. `end` is the hit point when `hit != 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugRay {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub kind: u32,
    pub hit: u32,
}

impl DebugRay {
    pub fn kind(&self) -> Option<RayKind> {
        match self.kind {
            0 => Some(RayKind::Floor),
            1 => Some(RayKind::Ceiling),
            2 => Some(RayKind::Wall),
            3 => Some(RayKind::Lava),
            4 => Some(RayKind::Ledge),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit != 0
    }
}

/// Rays cast by one object, rebuilt every step.
#[derive(Debug, Clone, Default)]
pub struct RayLog {
    rays: Vec<DebugRay>,
}

impl RayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ray of `length` along `direction`, cut short at `hit_distance`.
    pub fn record(&mut self, kind: RayKind, origin: Vec2, direction: Vec2, length: f32, hit_distance: Option<f32>) {
        let reach = hit_distance.unwrap_or(length);
        let end = origin + direction.normalize_or_zero() * reach;
        self.rays.push(DebugRay {
            start: origin.to_array(),
            end: end.to_array(),
            kind: kind as u32,
            hit: hit_distance.is_some() as u32,
        });
    }

    pub fn clear(&mut self) {
        self.rays.clear();
    }

    pub fn rays(&self) -> &[DebugRay] {
        &self.rays
    }

    pub fn count(&self, kind: RayKind) -> usize {
        self.rays.iter().filter(|r| r.kind == kind as u32).count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rays_end_at_the_hit() {
        let mut log = RayLog::new();
        log.record(RayKind::Floor, Vec2::new(1.0, 1.0), Vec2::NEG_Y, 0.5, Some(0.25));
        log.record(RayKind::Wall, Vec2::ZERO, Vec2::X, 0.3, None);
        let rays = log.rays();
        assert_eq!(rays[0].end, [1.0, 0.75]);
        assert!(rays[0].is_hit());
        assert_eq!(rays[1].end, [0.3, 0.0]);
        assert_eq!(rays[1].kind(), Some(RayKind::Wall));
        assert_eq!(log.count(RayKind::Floor), 1);
    }

    #[test]
    fn byte_view_matches_layout() {
        let mut log = RayLog::new();
        log.record(RayKind::Lava, Vec2::ZERO, Vec2::NEG_Y, 1.0, None);
        assert_eq!(log.as_bytes().len(), std::mem::size_of::<DebugRay>());
        assert_eq!(std::mem::size_of::<DebugRay>(), 24);
        log.clear();
        assert!(log.as_bytes().is_empty());
    }
}
