//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::DVec2;
use logistico_core::{FootprintSize, PixelRect, TowerId, TowerSnapshot, WorldPoint};

/// Multiplier applied to the elapsed cooldown when advancing capture keyframes.
const ANIMATION_SPEEDUP: f64 = 1.5;

/// Stationary processor that captures packages on a cooldown.
///
/// A tower cools down for `rate` ticks, becomes ready, and stays ready until a
/// capture calls [`Tower::ready_reset`]. The capture animation is purely
/// visual and never influences readiness.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    location: WorldPoint,
    rate: u32,
    radius: f64,
    ready: bool,
    tick: u32,
    animation: Animation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Animation {
    current_frame: f64,
    animating: bool,
    frame_count: u32,
}

impl Tower {
    /// Creates a cooling-down tower. The stored rate is one less than `rate`.
    pub(crate) fn new(
        id: TowerId,
        location: WorldPoint,
        rate: u32,
        radius: f64,
        frame_count: u32,
    ) -> Self {
        Self {
            id,
            location,
            rate: rate.saturating_sub(1),
            radius,
            ready: false,
            tick: 0,
            animation: Animation {
                current_frame: 0.0,
                animating: false,
                frame_count,
            },
        }
    }

    pub(crate) fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) fn location(&self) -> DVec2 {
        DVec2::new(self.location.x(), self.location.y())
    }

    pub(crate) fn radius(&self) -> f64 {
        self.radius
    }

    pub(crate) fn ready(&self) -> bool {
        self.ready
    }

    /// Marks the tower ready once the cooldown elapsed, then counts the tick.
    pub(crate) fn update_ready(&mut self) {
        if self.tick >= self.rate {
            self.ready = true;
        }
        self.tick = self.tick.saturating_add(1);
    }

    /// Restarts the cooldown after a capture.
    pub(crate) fn ready_reset(&mut self) {
        self.ready = false;
        self.tick = 0;
    }

    /// Starts the capture animation.
    pub(crate) fn animate(&mut self) {
        self.animation.animating = true;
    }

    /// Per-tick update: readiness first, then the animation keyframe.
    pub(crate) fn update(&mut self) {
        self.update_ready();
        if self.animation.animating {
            self.update_frame();
        }
    }

    fn update_frame(&mut self) {
        let last_frame = self.animation.frame_count.saturating_sub(1) as f64;
        let frame = if self.rate == 0 {
            last_frame
        } else {
            let ticks_per_frame = self.rate as f64 / self.animation.frame_count as f64;
            ANIMATION_SPEEDUP * self.tick as f64 / ticks_per_frame
        };

        self.animation.current_frame = frame.min(last_frame);
        if self.animation.current_frame >= last_frame {
            self.animation.current_frame = 0.0;
            self.animation.animating = false;
        }
    }

    pub(crate) fn snapshot(&self, footprint: FootprintSize) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            location: self.location,
            rate: self.rate,
            radius: self.radius,
            ready: self.ready,
            footprint: PixelRect::centered_on(self.location.pixel(), footprint),
            animation_frame: self.animation.current_frame as u32,
            animating: self.animation.animating,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower with a freshly allocated identifier and stores it.
    pub(crate) fn insert(
        &mut self,
        location: WorldPoint,
        rate: u32,
        radius: f64,
        frame_count: u32,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let previous = self
            .entries
            .insert(id, Tower::new(id, location, rate, radius, frame_count));
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Identifiers of all towers in placement order.
    pub(crate) fn ids(&self) -> Vec<TowerId> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
