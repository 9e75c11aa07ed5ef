#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative factory floor state for Logisti-Co.
//!
//! The [`Factory`] owns every package and tower, the shared path and the
//! economy. Mutations arrive either through the [`apply`] command entry point
//! or the equivalent methods on [`Factory`]; both report their outcome as
//! [`Event`] values. Rejected requests leave the factory untouched and are
//! reported as events, never as errors.

mod packages;
mod towers;

use logistico_core::{
    Command, Event, FootprintSize, PackageId, PlacementBounds, PlacementError, RemovalError,
    TowerId, Waypoint, WorldPoint, CAPTURE_REWARD, DEFAULT_ANIMATION_FRAMES, TOWER_COST,
};
use thiserror::Error;
use tracing::{debug, warn};

use self::packages::{Package, PackageRegistry};
use self::towers::{Tower, TowerRegistry};

const DEFAULT_STARTING_MONEY: u64 = 300;
const DEFAULT_TOWER_FOOTPRINT: FootprintSize = FootprintSize::new(48, 48);
const DEFAULT_PLACEMENT_BOUNDS: PlacementBounds =
    PlacementBounds::new(Waypoint::new(0, 0), Waypoint::new(800, 600));
const DEFAULT_PATH: [Waypoint; 8] = [
    Waypoint::new(0, 84),
    Waypoint::new(675, 84),
    Waypoint::new(675, 213),
    Waypoint::new(112, 213),
    Waypoint::new(112, 366),
    Waypoint::new(675, 366),
    Waypoint::new(675, 526),
    Waypoint::new(0, 526),
];

/// Reasons a [`FactoryConfig`] cannot produce a factory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Packages need at least one waypoint to spawn on.
    #[error("factory path must contain at least one waypoint")]
    EmptyPath,
    /// Towers need a footprint to be hit tested and drawn.
    #[error("tower footprint {width}x{height} must have non-zero width and height")]
    DegenerateFootprint {
        /// Configured footprint width.
        width: u32,
        /// Configured footprint height.
        height: u32,
    },
    /// The placement region must contain at least one pixel.
    #[error("placement bounds enclose no pixels")]
    EmptyPlacementBounds,
}

/// Construction parameters for a [`Factory`].
#[derive(Clone, Debug, PartialEq)]
pub struct FactoryConfig {
    /// Money available before the first tower is placed.
    pub starting_money: u64,
    /// Route every package follows, starting at its spawn point.
    pub path: Vec<Waypoint>,
    /// Region in which controllers may place towers.
    pub placement_bounds: PlacementBounds,
    /// Pixel box of a tower used for hit testing.
    pub tower_footprint: FootprintSize,
    /// Number of keyframes in the capture animation.
    pub animation_frames: u32,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            starting_money: DEFAULT_STARTING_MONEY,
            path: DEFAULT_PATH.to_vec(),
            placement_bounds: DEFAULT_PLACEMENT_BOUNDS,
            tower_footprint: DEFAULT_TOWER_FOOTPRINT,
            animation_frames: DEFAULT_ANIMATION_FRAMES,
        }
    }
}

impl FactoryConfig {
    /// Overrides the starting money.
    #[must_use]
    pub fn with_starting_money(mut self, starting_money: u64) -> Self {
        self.starting_money = starting_money;
        self
    }

    /// Overrides the package route.
    #[must_use]
    pub fn with_path(mut self, path: Vec<Waypoint>) -> Self {
        self.path = path;
        self
    }

    /// Checks that the configuration describes a playable floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if self.tower_footprint.is_degenerate() {
            return Err(ConfigError::DegenerateFootprint {
                width: self.tower_footprint.width(),
                height: self.tower_footprint.height(),
            });
        }
        if self.placement_bounds.is_empty() {
            return Err(ConfigError::EmptyPlacementBounds);
        }
        Ok(())
    }
}

/// Represents the authoritative factory floor.
#[derive(Debug)]
pub struct Factory {
    path: Vec<Waypoint>,
    placement_bounds: PlacementBounds,
    tower_footprint: FootprintSize,
    animation_frames: u32,
    packages: PackageRegistry,
    towers: TowerRegistry,
    money: u64,
    packed: u32,
    failed: u32,
}

impl Factory {
    /// Creates a factory on the default floor with the provided funds.
    #[must_use]
    pub fn new(starting_money: u64) -> Self {
        Self::from_config(FactoryConfig::default().with_starting_money(starting_money))
    }

    /// Creates a factory from an explicit configuration.
    pub fn with_config(config: FactoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: FactoryConfig) -> Self {
        Self {
            path: config.path,
            placement_bounds: config.placement_bounds,
            tower_footprint: config.tower_footprint,
            animation_frames: config.animation_frames,
            packages: PackageRegistry::new(),
            towers: TowerRegistry::new(),
            money: config.starting_money,
            packed: 0,
            failed: 0,
        }
    }

    /// Places a tower when the player can afford it.
    ///
    /// Insufficient funds leave the factory unchanged and are reported as
    /// [`Event::TowerPlacementRejected`].
    pub fn generate_tower(
        &mut self,
        location: WorldPoint,
        rate: u32,
        radius: f64,
        out_events: &mut Vec<Event>,
    ) {
        if self.money < TOWER_COST {
            debug!(money = self.money, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected {
                location,
                reason: PlacementError::InsufficientFunds {
                    required: TOWER_COST,
                    available: self.money,
                },
            });
            return;
        }

        let tower = self
            .towers
            .insert(location, rate, radius, self.animation_frames);
        self.money -= TOWER_COST;
        debug!(tower = tower.get(), x = location.x(), y = location.y(), "tower placed");
        out_events.push(Event::TowerPlaced { tower, location });
    }

    /// Removes a placed tower and refunds its cost.
    pub fn remove_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        if self.towers.remove(tower).is_none() {
            out_events.push(Event::TowerRemovalRejected {
                tower,
                reason: RemovalError::MissingTower,
            });
            return;
        }

        self.money = self.money.saturating_add(TOWER_COST);
        debug!(tower = tower.get(), "tower removed");
        out_events.push(Event::TowerRemoved { tower });
    }

    /// Spawns a package on the first waypoint of `path`.
    pub fn generate_package(&mut self, path: &[Waypoint], out_events: &mut Vec<Event>) {
        let Some(package) = Package::spawn(path) else {
            warn!("ignoring package spawn with an empty path");
            return;
        };

        let spawned_at = package.location();
        let id = self.packages.insert(package);
        out_events.push(Event::PackageSpawned {
            package: id,
            location: WorldPoint::new(spawned_at.x, spawned_at.y),
        });
    }

    /// Moves every live package and retires those that exhausted their path.
    ///
    /// Identifiers are snapshotted before moving and removals are applied
    /// after the scan.
    pub fn update_packages(&mut self, out_events: &mut Vec<Event>) {
        let mut exhausted: Vec<PackageId> = Vec::new();
        for id in self.packages.ids() {
            if let Some(package) = self.packages.get_mut(id) {
                if !package.advance() {
                    exhausted.push(id);
                }
            }
        }

        for id in exhausted {
            if self.packages.remove(id).is_some() {
                self.failed = self.failed.saturating_add(1);
                debug!(package = id.get(), failed = self.failed, "package failed");
                out_events.push(Event::PackageFailed { package: id });
            }
        }
    }

    /// Returns the package closest to `tower` within its capture radius.
    ///
    /// Ties keep the package spawned first.
    #[must_use]
    pub fn closest_to(&self, tower: TowerId) -> Option<PackageId> {
        let tower = self.towers.get(tower)?;
        closest_package(&self.packages, tower)
    }

    /// Lets ready towers capture their closest package, then advances every tower.
    pub fn update_robots(&mut self, out_events: &mut Vec<Event>) {
        for id in self.towers.ids() {
            let Some(tower) = self.towers.get_mut(id) else {
                continue;
            };

            if tower.ready() {
                if let Some(package) = closest_package(&self.packages, tower) {
                    let _ = self.packages.remove(package);
                    self.packed = self.packed.saturating_add(1);
                    self.money = self.money.saturating_add(CAPTURE_REWARD);
                    tower.ready_reset();
                    tower.animate();
                    debug!(tower = tower.id().get(), package = package.get(), "package captured");
                    out_events.push(Event::PackageCaptured {
                        tower: tower.id(),
                        package,
                    });
                }
            }

            tower.update();
        }
    }
}

fn closest_package(packages: &PackageRegistry, tower: &Tower) -> Option<PackageId> {
    let origin = tower.location();
    let mut closest: Option<(PackageId, f64)> = None;

    for (id, package) in packages.iter() {
        let distance = package.location().distance(origin);
        if distance > tower.radius() {
            continue;
        }

        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((id, distance)),
        }
    }

    closest.map(|(id, _)| id)
}

/// Applies the provided command to the factory, mutating state deterministically.
pub fn apply(factory: &mut Factory, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTower {
            location,
            rate,
            radius,
        } => factory.generate_tower(location, rate, radius, out_events),
        Command::RemoveTower { tower } => factory.remove_tower(tower, out_events),
        Command::SpawnPackage { path } => factory.generate_package(&path, out_events),
        Command::UpdatePackages => factory.update_packages(out_events),
        Command::UpdateTowers => factory.update_robots(out_events),
    }
}

/// Query functions that provide read-only access to the factory state.
pub mod query {
    use logistico_core::{
        PackageSnapshot, PackageView, PlacementBounds, Scoreboard, TowerId,
        TowerSnapshot, TowerView, Waypoint,
    };

    use super::Factory;

    /// Captures a read-only view of the packages on the floor.
    #[must_use]
    pub fn package_view(factory: &Factory) -> PackageView {
        let snapshots: Vec<PackageSnapshot> = factory
            .packages
            .iter()
            .map(|(id, package)| package.snapshot(id))
            .collect();
        PackageView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(factory: &Factory) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = factory
            .towers
            .iter()
            .map(|tower| tower.snapshot(factory.tower_footprint))
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Number of packages currently on the floor.
    #[must_use]
    pub fn package_count(factory: &Factory) -> usize {
        factory.packages.len()
    }

    /// Number of towers currently placed.
    #[must_use]
    pub fn tower_count(factory: &Factory) -> usize {
        factory.towers.len()
    }

    /// Towers whose footprint contains `point`, in placement order.
    #[must_use]
    pub fn towers_at(factory: &Factory, point: Waypoint) -> Vec<TowerId> {
        tower_view(factory).towers_at(point)
    }

    /// Money available to the player.
    #[must_use]
    pub fn money(factory: &Factory) -> u64 {
        factory.money
    }

    /// Packages captured by towers so far.
    #[must_use]
    pub fn packed(factory: &Factory) -> u32 {
        factory.packed
    }

    /// Packages that reached the end of the path so far.
    #[must_use]
    pub fn failed(factory: &Factory) -> u32 {
        factory.failed
    }

    /// Money and delivery counters in a single snapshot.
    #[must_use]
    pub fn scoreboard(factory: &Factory) -> Scoreboard {
        Scoreboard {
            money: factory.money,
            packed: factory.packed,
            failed: factory.failed,
        }
    }

    /// Route every generated package follows.
    #[must_use]
    pub fn path(factory: &Factory) -> &[Waypoint] {
        &factory.path
    }

    /// Region in which towers may be placed.
    #[must_use]
    pub fn placement_bounds(factory: &Factory) -> PlacementBounds {
        factory.placement_bounds
    }
}
