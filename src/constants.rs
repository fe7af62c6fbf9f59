//! World layout, camera path and tuning constants.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The seven fixed regions of the world, in path order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    EntryPortal,
    CentralNexus,
    SystemsTower,
    InterfaceSanctum,
    SimulationForge,
    KnowledgeCore,
    ResumeCodex,
}

pub const ZONE_COUNT: usize = 7;

pub const ALL_ZONES: [Zone; ZONE_COUNT] = [
    Zone::EntryPortal,
    Zone::CentralNexus,
    Zone::SystemsTower,
    Zone::InterfaceSanctum,
    Zone::SimulationForge,
    Zone::KnowledgeCore,
    Zone::ResumeCodex,
];

impl Zone {
    pub fn index(self) -> usize {
        ALL_ZONES.iter().position(|z| *z == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Zone> {
        ALL_ZONES.get(index).copied()
    }

    pub fn slug(self) -> &'static str {
        match self {
            Zone::EntryPortal => "entry-portal",
            Zone::CentralNexus => "central-nexus",
            Zone::SystemsTower => "systems-tower",
            Zone::InterfaceSanctum => "interface-sanctum",
            Zone::SimulationForge => "simulation-forge",
            Zone::KnowledgeCore => "knowledge-core",
            Zone::ResumeCodex => "resume-codex",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Zone> {
        ALL_ZONES.iter().copied().find(|z| z.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::EntryPortal => "Entry Portal",
            Zone::CentralNexus => "Central Nexus",
            Zone::SystemsTower => "Systems Tower",
            Zone::InterfaceSanctum => "Interface Sanctum",
            Zone::SimulationForge => "Simulation Forge",
            Zone::KnowledgeCore => "Knowledge Core",
            Zone::ResumeCodex => "Resume Codex",
        }
    }

    /// World-space anchor of the zone.
    pub fn anchor(self) -> DVec3 {
        WORLD_ZONES[self.index()].position
    }

    pub fn radius(self) -> f64 {
        WORLD_ZONES[self.index()].radius
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ZoneAnchor {
    pub position: DVec3,
    pub radius: f64,
}

pub const WORLD_ZONES: [ZoneAnchor; ZONE_COUNT] = [
    ZoneAnchor { position: DVec3::new(0.0, 0.0, 10.0), radius: 5.0 },
    ZoneAnchor { position: DVec3::new(0.0, 0.0, 0.0), radius: 8.0 },
    ZoneAnchor { position: DVec3::new(-15.0, 5.0, -10.0), radius: 6.0 },
    ZoneAnchor { position: DVec3::new(15.0, 0.0, -10.0), radius: 6.0 },
    ZoneAnchor { position: DVec3::new(0.0, 8.0, -20.0), radius: 6.0 },
    ZoneAnchor { position: DVec3::new(-10.0, -5.0, -30.0), radius: 5.0 },
    ZoneAnchor { position: DVec3::new(10.0, -5.0, -30.0), radius: 5.0 },
];

/// A (camera position, look-at target) pair; one per zone, in path order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub position: DVec3,
    pub target: DVec3,
}

pub const CAMERA_PATH: [Waypoint; ZONE_COUNT] = [
    Waypoint { position: DVec3::new(0.0, 2.0, 15.0), target: DVec3::new(0.0, 0.0, 10.0) },
    Waypoint { position: DVec3::new(0.0, 5.0, 8.0), target: DVec3::new(0.0, 0.0, 0.0) },
    Waypoint { position: DVec3::new(-8.0, 8.0, 5.0), target: DVec3::new(-15.0, 5.0, -10.0) },
    Waypoint { position: DVec3::new(8.0, 3.0, 5.0), target: DVec3::new(15.0, 0.0, -10.0) },
    Waypoint { position: DVec3::new(0.0, 12.0, -5.0), target: DVec3::new(0.0, 8.0, -20.0) },
    Waypoint { position: DVec3::new(-5.0, 0.0, -15.0), target: DVec3::new(-10.0, -5.0, -30.0) },
    Waypoint { position: DVec3::new(5.0, 0.0, -15.0), target: DVec3::new(10.0, -5.0, -30.0) },
];

/// Cinematic transition durations, seconds.
pub mod durations {
    pub const CAMERA_TRANSITION: f64 = 2.0;
    pub const PORTAL_ENTRY: f64 = 1.5;
    pub const PORTAL_EXIT: f64 = 1.2;
    pub const ZONE_TRANSITION: f64 = 1.8;
}

/// Interaction tuning.
pub mod interaction {
    /// Maximum hit distance from the camera for hover/click, world units.
    pub const HOVER_DISTANCE: f64 = 50.0;
    pub const SCROLL_SENSITIVITY: f64 = 0.001;
    pub const TOUCH_SENSITIVITY: f64 = 0.002;
    /// Max displacement in CSS pixels for a touch to count as a tap.
    pub const TAP_THRESHOLD_PX: f64 = 10.0;
}

pub mod scrolling {
    /// Fraction of remaining distance applied per frame.
    pub const SMOOTHING: f64 = 0.1;
    /// Snap threshold that stops asymptotic creep.
    pub const EPSILON: f64 = 1e-4;
    /// Progress step per arrow/page key press.
    pub const KEY_STEP: f64 = 0.05;
    /// Per-frame multiplicative decay of the last raw delta.
    pub const DELTA_DECAY: f64 = 0.9;
}
