//! Hit regions
//!
//! The layout collaborator reports one rectangle per rendered element;
//! points are mapped back to nodes by searching them.

use lumen_dom::NodeId;

/// Rendered rectangle of one element, in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub node: NodeId,
}

impl HitRegion {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, node: NodeId) -> Self {
        Self { x1, y1, x2, y2, node }
    }

    /// Edges are inclusive
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Node under the point; later regions paint over earlier ones
pub fn hit_test(regions: &[HitRegion], x: f32, y: f32) -> Option<NodeId> {
    regions.iter().rev().find(|r| r.contains(x, y)).map(|r| r.node)
}
