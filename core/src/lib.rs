#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Logisti-Co engine.
//!
//! Adapters and systems describe desired mutations as [`Command`] values, the
//! factory executes them through its `apply` entry point and broadcasts
//! [`Event`] values describing what actually happened. Read access flows
//! through immutable views such as [`PackageView`] and [`TowerView`].

use serde::{Deserialize, Serialize};

/// Money deducted when a tower is placed and refunded when it is removed.
pub const TOWER_COST: u64 = 100;

/// Money credited for every package captured by a tower.
pub const CAPTURE_REWARD: u64 = 25;

/// Distance a package travels along its path during a single tick.
pub const PACKAGE_SPEED: f64 = 1.0;

/// Spawn interval below which the exponential generator stops accelerating.
pub const MIN_ACCELERATING_GEN_RATE: f64 = 30.0;

/// Number of keyframes in the default tower capture animation.
pub const DEFAULT_ANIMATION_FRAMES: u32 = 66;

/// Commands that express all permissible factory mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests placement of a tower centred on the provided location.
    PlaceTower {
        /// Centre of the tower in world units.
        location: WorldPoint,
        /// Configured number of ticks between consecutive captures.
        rate: u32,
        /// Capture radius measured in world units.
        radius: f64,
    },
    /// Requests removal of an existing tower and a refund of its cost.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Requests that a package enters the floor at the first waypoint of `path`.
    SpawnPackage {
        /// Waypoints the package follows, starting with its spawn point.
        path: Vec<Waypoint>,
    },
    /// Advances every live package by one step and retires exhausted ones.
    UpdatePackages,
    /// Lets every ready tower capture its closest package and advances tower timers.
    UpdateTowers,
}

/// Events broadcast by the factory after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a package entered the floor.
    PackageSpawned {
        /// Identifier assigned to the package.
        package: PackageId,
        /// Location the package occupies after spawning.
        location: WorldPoint,
    },
    /// Reports that a package exhausted its path without being captured.
    PackageFailed {
        /// Identifier of the package that left the floor.
        package: PackageId,
    },
    /// Reports that a tower captured a package.
    PackageCaptured {
        /// Tower that performed the capture.
        tower: TowerId,
        /// Package removed from the floor.
        package: PackageId,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Centre of the tower in world units.
        location: WorldPoint,
    },
    /// Confirms that a tower was removed and its cost refunded.
    TowerRemoved {
        /// Identifier of the removed tower.
        tower: TowerId,
    },
    /// Reports that a placement request left the factory unchanged.
    TowerPlacementRejected {
        /// Location provided in the placement request.
        location: WorldPoint,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a removal request left the factory unchanged.
    TowerRemovalRejected {
        /// Identifier provided in the removal request.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
}

/// Unique identifier assigned to a package.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(u32);

impl PackageId {
    /// Creates a new package identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Whole-pixel coordinate on the factory floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Waypoint {
    x: i32,
    y: i32,
}

impl Waypoint {
    /// Creates a new waypoint.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

impl From<(i32, i32)> for Waypoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Continuous position on the factory floor expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f64,
    y: f64,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Pixel containing the point, truncating each axis toward zero.
    #[must_use]
    pub fn pixel(&self) -> Waypoint {
        Waypoint::new(self.x as i32, self.y as i32)
    }
}

impl From<Waypoint> for WorldPoint {
    fn from(waypoint: Waypoint) -> Self {
        Self::new(waypoint.x() as f64, waypoint.y() as f64)
    }
}

/// Dimensions of an entity's on-screen footprint in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootprintSize {
    width: u32,
    height: u32,
}

impl FootprintSize {
    /// Creates a new footprint size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the footprint in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the footprint in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether either dimension is zero.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned pixel rectangle.
///
/// Containment is half-open: the left and top edges belong to the rectangle,
/// the right and bottom edges do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    left: i32,
    top: i32,
    size: FootprintSize,
}

impl PixelRect {
    /// Creates a rectangle anchored at its upper-left corner.
    #[must_use]
    pub const fn new(left: i32, top: i32, size: FootprintSize) -> Self {
        Self { left, top, size }
    }

    /// Creates a rectangle of `size` whose centre lies on `center`.
    #[must_use]
    pub fn centered_on(center: Waypoint, size: FootprintSize) -> Self {
        let half_width = i32::try_from(size.width() / 2).unwrap_or(i32::MAX);
        let half_height = i32::try_from(size.height() / 2).unwrap_or(i32::MAX);
        Self {
            left: center.x().saturating_sub(half_width),
            top: center.y().saturating_sub(half_height),
            size,
        }
    }

    /// Left edge of the rectangle.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Top edge of the rectangle.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Reports whether the provided pixel lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Waypoint) -> bool {
        let dx = i64::from(point.x()) - i64::from(self.left);
        let dy = i64::from(point.y()) - i64::from(self.top);
        dx >= 0
            && dy >= 0
            && dx < i64::from(self.size.width())
            && dy < i64::from(self.size.height())
    }
}

/// Inclusive region of the floor in which towers may be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementBounds {
    min: Waypoint,
    max: Waypoint,
}

impl PlacementBounds {
    /// Creates bounds spanning `min..=max` on both axes.
    #[must_use]
    pub const fn new(min: Waypoint, max: Waypoint) -> Self {
        Self { min, max }
    }

    /// Reports whether the bounds enclose no pixel at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.x() > self.max.x() || self.min.y() > self.max.y()
    }

    /// Reports whether `point` lies within the bounds, edges included.
    #[must_use]
    pub const fn contains(&self, point: Waypoint) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }
}

/// Reasons a tower placement request may be rejected by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The player cannot afford another tower.
    InsufficientFunds {
        /// Cost of a single tower.
        required: u64,
        /// Money held when the request was processed.
        available: u64,
    },
}

/// Reasons a tower removal request may be rejected by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No tower with the provided identifier is placed.
    MissingTower,
}

/// Immutable representation of a single package used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackageSnapshot {
    /// Identifier assigned to the package.
    pub id: PackageId,
    /// Exact location of the package.
    pub location: WorldPoint,
    /// Waypoints left to visit, including the current head.
    pub remaining_waypoints: usize,
}

/// Read-only snapshot describing all packages on the floor.
#[derive(Clone, Debug, Default)]
pub struct PackageView {
    snapshots: Vec<PackageSnapshot>,
}

impl PackageView {
    /// Creates a new package view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PackageSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &PackageSnapshot> {
        self.snapshots.iter()
    }

    /// Number of packages captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the floor held no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PackageSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the factory.
    pub id: TowerId,
    /// Centre of the tower.
    pub location: WorldPoint,
    /// Stored cooldown, one less than the configured rate.
    pub rate: u32,
    /// Capture radius in world units.
    pub radius: f64,
    /// Whether the tower may capture on the next update.
    pub ready: bool,
    /// Pixel box used for hit testing and drawing.
    pub footprint: PixelRect,
    /// Keyframe currently displayed.
    pub animation_frame: u32,
    /// Whether the capture animation is playing.
    pub animating: bool,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Identifiers of every tower whose footprint contains `point`.
    #[must_use]
    pub fn towers_at(&self, point: Waypoint) -> Vec<TowerId> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.footprint.contains(point))
            .map(|snapshot| snapshot.id)
            .collect()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Economy and delivery counters surfaced to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Money available for tower placement.
    pub money: u64,
    /// Packages captured by towers.
    pub packed: u32,
    /// Packages that reached the end of the path.
    pub failed: u32,
}
