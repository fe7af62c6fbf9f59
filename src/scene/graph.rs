//! Minimal id-keyed scene graph used for hit testing.
//!
//! Interactive visuals register a node with a world position and a bounding
//! sphere; composite visuals register child nodes under a parent so that a
//! hit on any part resolves to the registered ancestor through stable
//! parent links.

use std::collections::HashMap;

use glam::DVec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub position: DVec3,
    /// Bounding sphere radius; zero means the node is not hit-testable.
    pub radius: f64,
    pub hovered: bool,
    /// Free-form tag so views can map hits back to app objects.
    pub tag: String,
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Nearest positive intersection distance with a sphere, if any.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        if radius <= 0.0 {
            return None;
        }
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = -b - sqrt_disc;
        let t1 = -b + sqrt_disc;
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            // Origin inside the sphere.
            Some(0.0)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f64,
}

#[derive(Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        position: DVec3,
        radius: f64,
        tag: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                parent,
                position,
                radius,
                hovered: false,
                tag: tag.into(),
            },
        );
        id
    }

    /// Remove a node and everything parented under it.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let doomed: Vec<NodeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|n| self.is_descendant_of(*n, id) || *n == id)
            .collect();
        for n in doomed {
            self.nodes.remove(&n);
        }
    }

    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(&p).and_then(|n| n.parent);
        }
        false
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn set_position(&mut self, id: NodeId, position: DVec3) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    pub fn set_hovered(&mut self, id: NodeId, hovered: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.hovered = hovered;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// All sphere hits along the ray, nearest first.
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .nodes
            .iter()
            .filter_map(|(id, node)| {
                ray.intersect_sphere(node.position, node.radius)
                    .map(|distance| RayHit { node: *id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Walk the parent chain from `id` (inclusive) until a node satisfies
    /// `is_registered`; hit geometry is usually a child of the handle the
    /// caller registered.
    pub fn resolve_registered(
        &self,
        id: NodeId,
        is_registered: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if is_registered(node_id) {
                return Some(node_id);
            }
            current = self.nodes.get(&node_id).and_then(|n| n.parent);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raycast_returns_nearest_hit_first() {
        let mut graph = SceneGraph::new();
        let near = graph.insert(None, DVec3::new(0.0, 0.0, -5.0), 1.0, "near");
        let far = graph.insert(None, DVec3::new(0.0, 0.0, -20.0), 1.0, "far");
        graph.insert(None, DVec3::new(100.0, 0.0, 0.0), 1.0, "aside");

        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let hits = graph.raycast(&ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn sphere_behind_origin_is_not_hit() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_sphere(DVec3::new(0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn resolve_registered_walks_parent_chain() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(None, DVec3::ZERO, 0.0, "portal");
        let mid = graph.insert(Some(root), DVec3::ZERO, 0.0, "frame");
        let leaf = graph.insert(Some(mid), DVec3::ZERO, 1.0, "mesh");

        let resolved = graph.resolve_registered(leaf, |n| n == root);
        assert_eq!(resolved, Some(root));
        assert_eq!(graph.resolve_registered(leaf, |_| false), None);
    }

    #[test]
    fn remove_subtree_takes_children_along() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(None, DVec3::ZERO, 0.0, "a");
        let child = graph.insert(Some(root), DVec3::ZERO, 1.0, "b");
        let grandchild = graph.insert(Some(child), DVec3::ZERO, 1.0, "c");
        let other = graph.insert(None, DVec3::ZERO, 1.0, "d");

        graph.remove_subtree(root);
        assert!(graph.node(root).is_none());
        assert!(graph.node(child).is_none());
        assert!(graph.node(grandchild).is_none());
        assert!(graph.node(other).is_some());
    }

    #[test]
    fn ray_origin_inside_sphere_reports_zero_distance() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(ray.intersect_sphere(DVec3::ZERO, 2.0), Some(0.0));
    }
}
