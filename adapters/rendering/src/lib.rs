#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Logisti-Co adapters.

mod assets;

use anyhow::Result as AnyResult;
use logistico_core::{
    FootprintSize, PackageId, PackageView, PixelRect, Scoreboard, TowerId, TowerView, Waypoint,
    WorldPoint,
};

pub use assets::{AssetBundle, SUPPORTED_MANIFEST_VERSION};

/// Package drawn at its current location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePackage {
    /// Identifier of the package.
    pub id: PackageId,
    /// Exact location of the package.
    pub location: WorldPoint,
    /// Sprite box centred on the package pixel.
    pub sprite: PixelRect,
}

/// Tower drawn with its current animation keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Centre of the tower.
    pub location: WorldPoint,
    /// Pixel box covered by the tower sprite.
    pub footprint: PixelRect,
    /// Keyframe to display.
    pub frame: u32,
    /// Whether the capture animation is playing.
    pub animating: bool,
    /// Whether the tower can capture on the next update.
    pub ready: bool,
}

/// Heads-up display counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Packages captured so far.
    pub packed: u32,
    /// Packages that may still fail before the session ends.
    pub lives: u32,
    /// Money available to the player.
    pub money: u64,
}

impl Hud {
    /// Derives the HUD counters from the factory scoreboard.
    #[must_use]
    pub const fn new(scoreboard: Scoreboard, max_failed: u32) -> Self {
        Self {
            packed: scoreboard.packed,
            lives: max_failed.saturating_sub(scoreboard.failed),
            money: scoreboard.money,
        }
    }

    /// Labelled HUD lines in display order.
    #[must_use]
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Successes: {}", self.packed),
            format!("Lives: {}", self.lives),
            format!("Money: {}", self.money),
        ]
    }
}

/// Scene description combining the factory path, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Packages currently on the floor, in spawn order.
    pub packages: Vec<ScenePackage>,
    /// Placed towers, in placement order.
    pub towers: Vec<SceneTower>,
    /// Route packages follow.
    pub path: Vec<Waypoint>,
    /// Counters shown beside the floor.
    pub hud: Hud,
}

impl Scene {
    /// Builds a scene from factory snapshots.
    #[must_use]
    pub fn from_views(
        packages: &PackageView,
        towers: &TowerView,
        path: &[Waypoint],
        hud: Hud,
        package_size: FootprintSize,
    ) -> Self {
        let packages = packages
            .iter()
            .map(|snapshot| ScenePackage {
                id: snapshot.id,
                location: snapshot.location,
                sprite: PixelRect::centered_on(snapshot.location.pixel(), package_size),
            })
            .collect();
        let towers = towers
            .iter()
            .map(|snapshot| SceneTower {
                id: snapshot.id,
                location: snapshot.location,
                footprint: snapshot.footprint,
                frame: snapshot.animation_frame,
                animating: snapshot.animating,
                ready: snapshot.ready,
            })
            .collect();

        Self {
            packages,
            towers,
            path: path.to_vec(),
            hud,
        }
    }
}

/// Rendering backend capable of presenting Logisti-Co scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn draw(&mut self, scene: &Scene) -> AnyResult<()>;
}
