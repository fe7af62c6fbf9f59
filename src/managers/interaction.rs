//! Pointer and touch dispatch over the scene graph.
//!
//! The world view translates DOM events into camera rays and feeds them
//! here; this module owns hover edge detection, per-object callbacks and the
//! tap-vs-drag distinction for touch input.

use std::collections::HashMap;

use crate::constants::interaction;
use crate::scene::graph::{NodeId, Ray, SceneGraph};

/// Per-object handlers, registered against a scene-graph node. A hit on any
/// descendant of the node dispatches to these.
#[derive(Default)]
pub struct InteractionCallbacks {
    pub on_hover_in: Option<Box<dyn Fn(NodeId)>>,
    pub on_hover_out: Option<Box<dyn Fn(NodeId)>>,
    pub on_click: Option<Box<dyn Fn(NodeId)>>,
}

/// Catch-all handlers that fire for every dispatch, after the per-object
/// ones. Used by overlays (cursor styling, click sounds).
#[derive(Default)]
pub struct GlobalCallbacks {
    pub on_hover: Option<Box<dyn Fn(Option<NodeId>)>>,
    pub on_click: Option<Box<dyn Fn(NodeId)>>,
}

pub struct InteractionManager {
    registered: HashMap<NodeId, InteractionCallbacks>,
    hovered: Option<NodeId>,
    enabled: bool,
    hover_distance: f64,
    global: GlobalCallbacks,
    touch_start: Option<(f64, f64)>,
}

impl Default for InteractionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionManager {
    pub fn new() -> Self {
        Self {
            registered: HashMap::new(),
            hovered: None,
            enabled: true,
            hover_distance: interaction::HOVER_DISTANCE,
            global: GlobalCallbacks::default(),
            touch_start: None,
        }
    }

    pub fn with_hover_distance(mut self, distance: f64) -> Self {
        self.hover_distance = distance;
        self
    }

    pub fn register(&mut self, node: NodeId, callbacks: InteractionCallbacks) {
        self.registered.insert(node, callbacks);
    }

    /// Unregistering the hovered object drops the hover without firing its
    /// hover-out handler; the object is gone.
    pub fn unregister(&mut self, node: NodeId) {
        self.registered.remove(&node);
        if self.hovered == Some(node) {
            self.hovered = None;
        }
    }

    pub fn set_global_callbacks(&mut self, callbacks: GlobalCallbacks) {
        self.global = callbacks;
    }

    pub fn set_enabled(&mut self, enabled: bool, graph: &mut SceneGraph) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.clear_hover(graph);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    fn clear_hover(&mut self, graph: &mut SceneGraph) {
        if let Some(prev) = self.hovered.take() {
            graph.set_hovered(prev, false);
            if let Some(cb) = self.registered.get(&prev).and_then(|c| c.on_hover_out.as_ref()) {
                cb(prev);
            }
            if let Some(cb) = &self.global.on_hover {
                cb(None);
            }
        }
    }

    /// Nearest registered object hit by the ray, within the hover distance.
    fn pick(&self, ray: &Ray, graph: &SceneGraph) -> Option<NodeId> {
        graph
            .raycast(ray)
            .into_iter()
            .filter(|hit| hit.distance <= self.hover_distance)
            .find_map(|hit| {
                graph.resolve_registered(hit.node, |n| self.registered.contains_key(&n))
            })
    }

    /// Pointer-move dispatch: edge-triggered hover in/out against the
    /// current pick result.
    pub fn pointer_move(&mut self, ray: &Ray, graph: &mut SceneGraph) {
        if !self.enabled {
            return;
        }
        let picked = self.pick(ray, graph);
        if picked == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered {
            graph.set_hovered(prev, false);
            if let Some(cb) = self.registered.get(&prev).and_then(|c| c.on_hover_out.as_ref()) {
                cb(prev);
            }
        }
        if let Some(next) = picked {
            graph.set_hovered(next, true);
            if let Some(cb) = self.registered.get(&next).and_then(|c| c.on_hover_in.as_ref()) {
                cb(next);
            }
        }
        self.hovered = picked;
        if let Some(cb) = &self.global.on_hover {
            cb(picked);
        }
    }

    /// Click dispatch against whatever the ray hits right now, independent
    /// of hover state (the pointer may not have moved since the last frame).
    pub fn pointer_click(&mut self, ray: &Ray, graph: &mut SceneGraph) {
        if !self.enabled {
            return;
        }
        let Some(picked) = self.pick(ray, graph) else {
            return;
        };
        log::debug!("click on node {picked:?}");
        if let Some(cb) = self.registered.get(&picked).and_then(|c| c.on_click.as_ref()) {
            cb(picked);
        }
        if let Some(cb) = &self.global.on_click {
            cb(picked);
        }
    }

    pub fn touch_start(&mut self, client_x: f64, client_y: f64) {
        self.touch_start = Some((client_x, client_y));
    }

    /// A touch that ended within the tap threshold of where it started is a
    /// tap and dispatches as a click; anything further is a drag and is left
    /// to the scroll handling.
    pub fn touch_end(
        &mut self,
        client_x: f64,
        client_y: f64,
        ray: &Ray,
        graph: &mut SceneGraph,
    ) {
        let Some((start_x, start_y)) = self.touch_start.take() else {
            return;
        };
        let moved = ((client_x - start_x).powi(2) + (client_y - start_y).powi(2)).sqrt();
        if moved <= interaction::TAP_THRESHOLD_PX {
            self.pointer_click(ray, graph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        mgr: InteractionManager,
        graph: SceneGraph,
        portal: NodeId,
        skill: NodeId,
        events: Rc<RefCell<Vec<String>>>,
    }

    fn fixture() -> Fixture {
        let mut graph = SceneGraph::new();
        // Portal handle with hit geometry as a child.
        let portal = graph.insert(None, DVec3::new(0.0, 0.0, -10.0), 0.0, "portal");
        graph.insert(Some(portal), DVec3::new(0.0, 0.0, -10.0), 2.0, "portal-mesh");
        let skill = graph.insert(None, DVec3::new(20.0, 0.0, -10.0), 2.0, "skill");

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = InteractionManager::new();
        for (id, name) in [(portal, "portal"), (skill, "skill")] {
            let (e1, e2, e3) = (events.clone(), events.clone(), events.clone());
            let (n1, n2, n3) = (name, name, name);
            mgr.register(
                id,
                InteractionCallbacks {
                    on_hover_in: Some(Box::new(move |_| {
                        e1.borrow_mut().push(format!("in:{n1}"))
                    })),
                    on_hover_out: Some(Box::new(move |_| {
                        e2.borrow_mut().push(format!("out:{n2}"))
                    })),
                    on_click: Some(Box::new(move |_| {
                        e3.borrow_mut().push(format!("click:{n3}"))
                    })),
                },
            );
        }
        Fixture {
            mgr,
            graph,
            portal,
            skill,
            events,
        }
    }

    fn ray_toward(target: DVec3) -> Ray {
        Ray::new(DVec3::ZERO, target)
    }

    #[test]
    fn hover_is_edge_triggered() {
        let mut f = fixture();
        let at_portal = ray_toward(DVec3::new(0.0, 0.0, -10.0));

        f.mgr.pointer_move(&at_portal, &mut f.graph);
        f.mgr.pointer_move(&at_portal, &mut f.graph);
        assert_eq!(*f.events.borrow(), vec!["in:portal"]);
        assert_eq!(f.mgr.hovered(), Some(f.portal));
        assert!(f.graph.node(f.portal).unwrap().hovered);

        let away = ray_toward(DVec3::new(0.0, 100.0, 0.0));
        f.mgr.pointer_move(&away, &mut f.graph);
        assert_eq!(*f.events.borrow(), vec!["in:portal", "out:portal"]);
        assert_eq!(f.mgr.hovered(), None);
        assert!(!f.graph.node(f.portal).unwrap().hovered);
    }

    #[test]
    fn moving_between_objects_fires_out_then_in() {
        let mut f = fixture();
        f.mgr
            .pointer_move(&ray_toward(DVec3::new(0.0, 0.0, -10.0)), &mut f.graph);
        f.mgr
            .pointer_move(&ray_toward(DVec3::new(20.0, 0.0, -10.0)), &mut f.graph);
        assert_eq!(
            *f.events.borrow(),
            vec!["in:portal", "out:portal", "in:skill"]
        );
        assert_eq!(f.mgr.hovered(), Some(f.skill));
    }

    #[test]
    fn hit_on_child_geometry_resolves_to_registered_handle() {
        let mut f = fixture();
        // The portal handle itself has radius 0; only the child mesh is
        // hit-testable.
        f.mgr
            .pointer_click(&ray_toward(DVec3::new(0.0, 0.0, -10.0)), &mut f.graph);
        assert_eq!(*f.events.borrow(), vec!["click:portal"]);
    }

    #[test]
    fn hits_beyond_hover_distance_are_ignored() {
        let mut f = fixture();
        let mut far_graph = SceneGraph::new();
        let far = far_graph.insert(None, DVec3::new(0.0, 0.0, -500.0), 2.0, "far");
        f.mgr.register(far, InteractionCallbacks::default());
        f.mgr
            .pointer_move(&ray_toward(DVec3::new(0.0, 0.0, -500.0)), &mut far_graph);
        assert_eq!(f.mgr.hovered(), None);
    }

    #[test]
    fn disabled_manager_clears_hover_and_ignores_input() {
        let mut f = fixture();
        let at_portal = ray_toward(DVec3::new(0.0, 0.0, -10.0));
        f.mgr.pointer_move(&at_portal, &mut f.graph);
        assert_eq!(f.mgr.hovered(), Some(f.portal));

        f.mgr.set_enabled(false, &mut f.graph);
        assert_eq!(f.mgr.hovered(), None);
        assert!(!f.graph.node(f.portal).unwrap().hovered);

        f.mgr.pointer_click(&at_portal, &mut f.graph);
        assert_eq!(
            *f.events.borrow(),
            vec!["in:portal", "out:portal"]
        );
    }

    #[test]
    fn tap_dispatches_click_and_drag_does_not() {
        let mut f = fixture();
        let at_portal = ray_toward(DVec3::new(0.0, 0.0, -10.0));

        f.mgr.touch_start(100.0, 100.0);
        f.mgr.touch_end(103.0, 102.0, &at_portal, &mut f.graph);
        assert_eq!(*f.events.borrow(), vec!["click:portal"]);

        f.mgr.touch_start(100.0, 100.0);
        f.mgr.touch_end(100.0, 180.0, &at_portal, &mut f.graph);
        assert_eq!(*f.events.borrow(), vec!["click:portal"]);
    }

    #[test]
    fn global_callbacks_fire_after_per_object_ones() {
        let mut f = fixture();
        let (g1, g2) = (f.events.clone(), f.events.clone());
        f.mgr.set_global_callbacks(GlobalCallbacks {
            on_hover: Some(Box::new(move |picked| {
                g1.borrow_mut()
                    .push(format!("global-hover:{}", picked.is_some()))
            })),
            on_click: Some(Box::new(move |_| {
                g2.borrow_mut().push("global-click".into())
            })),
        });
        let at_portal = ray_toward(DVec3::new(0.0, 0.0, -10.0));
        f.mgr.pointer_move(&at_portal, &mut f.graph);
        f.mgr.pointer_click(&at_portal, &mut f.graph);
        assert_eq!(
            *f.events.borrow(),
            vec![
                "in:portal",
                "global-hover:true",
                "click:portal",
                "global-click"
            ]
        );
    }

    #[test]
    fn unregister_drops_hover_silently() {
        let mut f = fixture();
        let at_portal = ray_toward(DVec3::new(0.0, 0.0, -10.0));
        f.mgr.pointer_move(&at_portal, &mut f.graph);
        f.mgr.unregister(f.portal);
        assert_eq!(f.mgr.hovered(), None);
        assert_eq!(*f.events.borrow(), vec!["in:portal"]);
    }
}
