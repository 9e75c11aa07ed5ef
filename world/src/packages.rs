//! Package motion along the factory path.

use std::collections::{BTreeMap, VecDeque};

use glam::DVec2;
use logistico_core::{PackageId, PackageSnapshot, Waypoint, WorldPoint, PACKAGE_SPEED};

/// Mobile entity that walks an ordered list of waypoints at constant speed.
#[derive(Clone, Debug)]
pub(crate) struct Package {
    location: DVec2,
    path: VecDeque<Waypoint>,
}

impl Package {
    /// Places a package on the first waypoint of `path`.
    ///
    /// Returns `None` for an empty path.
    pub(crate) fn spawn(path: &[Waypoint]) -> Option<Self> {
        let start = path.first()?;
        Some(Self {
            location: to_dvec2(*start),
            path: path.iter().copied().collect(),
        })
    }

    pub(crate) fn location(&self) -> DVec2 {
        self.location
    }

    fn pixel(&self) -> Waypoint {
        WorldPoint::new(self.location.x, self.location.y).pixel()
    }

    /// Moves one step toward the head waypoint.
    ///
    /// Returns `false` once the path is exhausted, leaving the location
    /// untouched. A package resting on its only waypoint is exhausted on the
    /// first call.
    pub(crate) fn advance(&mut self) -> bool {
        if self.path.front() == Some(&self.pixel()) {
            let _ = self.path.pop_front();
        }

        let Some(head) = self.path.front().copied() else {
            return false;
        };

        let offset = to_dvec2(head) - self.location;
        let distance = offset.length();
        let direction = if distance == 0.0 {
            DVec2::ZERO
        } else {
            offset / distance
        };
        self.location += direction * PACKAGE_SPEED;
        true
    }

    pub(crate) fn snapshot(&self, id: PackageId) -> PackageSnapshot {
        PackageSnapshot {
            id,
            location: WorldPoint::new(self.location.x, self.location.y),
            remaining_waypoints: self.path.len(),
        }
    }
}

/// Registry of live packages keyed by spawn order.
#[derive(Debug)]
pub(crate) struct PackageRegistry {
    entries: BTreeMap<PackageId, Package>,
    next_package_id: PackageId,
}

impl PackageRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_package_id: PackageId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, package: Package) -> PackageId {
        let id = self.next_package_id;
        self.next_package_id = PackageId::new(id.get().wrapping_add(1));
        let previous = self.entries.insert(id, package);
        debug_assert!(previous.is_none(), "package identifiers are never reused");
        id
    }

    pub(crate) fn remove(&mut self, id: PackageId) -> Option<Package> {
        self.entries.remove(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.entries.get_mut(&id)
    }

    /// Identifiers of all live packages in spawn order.
    pub(crate) fn ids(&self) -> Vec<PackageId> {
        self.entries.keys().copied().collect()
    }

    /// Live packages in spawn order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.entries.iter().map(|(id, package)| (*id, package))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn to_dvec2(waypoint: Waypoint) -> DVec2 {
    DVec2::new(waypoint.x() as f64, waypoint.y() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(i32, i32)]) -> Vec<Waypoint> {
        points.iter().copied().map(Waypoint::from).collect()
    }

    fn moved_once(points: &[(i32, i32)]) -> (bool, DVec2) {
        let mut package = Package::spawn(&path(points)).expect("non-empty path");
        let moved = package.advance();
        (moved, package.location())
    }

    #[test]
    fn moves_one_unit_along_each_axis() {
        assert_eq!(moved_once(&[(0, 0), (10, 0)]), (true, DVec2::new(1.0, 0.0)));
        assert_eq!(moved_once(&[(0, 0), (0, 10)]), (true, DVec2::new(0.0, 1.0)));
        assert_eq!(moved_once(&[(0, 0), (-10, 0)]), (true, DVec2::new(-1.0, 0.0)));
        assert_eq!(moved_once(&[(0, 0), (0, -10)]), (true, DVec2::new(0.0, -1.0)));
        assert_eq!(moved_once(&[(5, 6), (5, 10)]), (true, DVec2::new(5.0, 7.0)));
    }

    #[test]
    fn duplicate_waypoint_holds_position() {
        assert_eq!(moved_once(&[(0, 0), (0, 0)]), (true, DVec2::new(0.0, 0.0)));
        assert_eq!(moved_once(&[(5, 6), (5, 6)]), (true, DVec2::new(5.0, 6.0)));
    }

    #[test]
    fn single_waypoint_path_is_exhausted_immediately() {
        assert_eq!(moved_once(&[(0, 0)]), (false, DVec2::new(0.0, 0.0)));
        assert_eq!(moved_once(&[(5, 6)]), (false, DVec2::new(5.0, 6.0)));
    }

    #[test]
    fn straight_path_takes_one_call_per_unit() {
        let mut package = Package::spawn(&path(&[(0, 0), (10, 0)])).expect("non-empty path");
        for _ in 0..10 {
            assert!(package.advance());
        }
        assert_eq!(package.location(), DVec2::new(10.0, 0.0));
        assert!(!package.advance());
        assert_eq!(package.location(), DVec2::new(10.0, 0.0));
    }

    #[test]
    fn turns_at_intermediate_waypoints() {
        let mut package =
            Package::spawn(&path(&[(0, 0), (2, 0), (2, 2)])).expect("non-empty path");
        for _ in 0..2 {
            assert!(package.advance());
        }
        assert_eq!(package.location(), DVec2::new(2.0, 0.0));
        assert!(package.advance());
        assert_eq!(package.location(), DVec2::new(2.0, 1.0));
        assert_eq!(package.snapshot(PackageId::new(0)).remaining_waypoints, 1);
    }

    fn moves_until_exhausted(points: &[(i32, i32)]) -> usize {
        let mut package = Package::spawn(&path(points)).expect("non-empty path");
        let mut moves = 0;
        while package.advance() {
            moves += 1;
            assert!(moves < 10_000, "package never exhausted {points:?}");
        }
        moves
    }

    #[test]
    fn diagonal_paths_settle_after_double_precision_step_counts() {
        assert_eq!(moves_until_exhausted(&[(0, 0), (6, 8)]), 11);
        assert_eq!(moves_until_exhausted(&[(0, 0), (8, 6)]), 11);
        assert_eq!(moves_until_exhausted(&[(0, 0), (5, 12)]), 13);
        assert_eq!(moves_until_exhausted(&[(0, 0), (12, 16)]), 21);
        assert_eq!(moves_until_exhausted(&[(0, 0), (3, 4)]), 5);
    }

    #[test]
    fn far_coordinates_still_advance() {
        let start = 20_000_000;
        assert_eq!(moves_until_exhausted(&[(start, 0), (start + 10, 0)]), 10);
    }

    #[test]
    fn empty_path_cannot_spawn() {
        assert!(Package::spawn(&[]).is_none());
    }

    #[test]
    fn registry_iterates_in_spawn_order() {
        let mut registry = PackageRegistry::new();
        let first = registry.insert(Package::spawn(&path(&[(3, 3)])).expect("path"));
        let second = registry.insert(Package::spawn(&path(&[(1, 1)])).expect("path"));
        let order: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![first, second]);
        assert!(registry.remove(first).is_some());
        assert_eq!(registry.ids(), vec![second]);
    }
}
