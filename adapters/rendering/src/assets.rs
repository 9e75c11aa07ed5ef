//! Asset manifest describing the sprites a graphical backend draws.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use logistico_core::{FootprintSize, DEFAULT_ANIMATION_FRAMES};

/// Manifest schema version understood by [`AssetBundle::load`].
pub const SUPPORTED_MANIFEST_VERSION: u32 = 1;

const DEFAULT_ASSET_ROOT: &str = "game_assets";
const DEFAULT_PACKAGE_SPRITE: &str = "box_texture/box.png";
const DEFAULT_TOWER_FRAMES: &str = "robot_animation_frames/yellow";
const DEFAULT_PACKAGE_SIZE: FootprintSize = FootprintSize::new(24, 24);
const DEFAULT_TOWER_SIZE: FootprintSize = FootprintSize::new(48, 48);

/// Resolved sprite locations and sizes owned by a rendering adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetBundle {
    package_sprite: PathBuf,
    tower_frames: PathBuf,
    frame_count: u32,
    package_size: FootprintSize,
    tower_size: FootprintSize,
}

impl Default for AssetBundle {
    fn default() -> Self {
        let root = Path::new(DEFAULT_ASSET_ROOT);
        Self {
            package_sprite: root.join(DEFAULT_PACKAGE_SPRITE),
            tower_frames: root.join(DEFAULT_TOWER_FRAMES),
            frame_count: DEFAULT_ANIMATION_FRAMES,
            package_size: DEFAULT_PACKAGE_SIZE,
            tower_size: DEFAULT_TOWER_SIZE,
        }
    }
}

impl AssetBundle {
    /// Loads a bundle from the manifest at `path`.
    ///
    /// Relative sprite paths are resolved against the manifest's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_manifest_str(&contents, &base)
    }

    /// Parses a manifest, resolving relative paths against `base_path`.
    pub fn from_manifest_str(contents: &str, base_path: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported asset manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }
        if manifest.frame_count == 0 {
            bail!("asset manifest must declare at least one tower frame");
        }

        let package_size = footprint(manifest.package_size, "package_size")?;
        let tower_size = footprint(manifest.tower_size, "tower_size")?;

        Ok(Self {
            package_sprite: base_path.join(manifest.package_sprite),
            tower_frames: base_path.join(manifest.tower_frames),
            frame_count: manifest.frame_count,
            package_size,
            tower_size,
        })
    }

    /// Sprite drawn for every package.
    #[must_use]
    pub fn package_sprite(&self) -> &Path {
        &self.package_sprite
    }

    /// Image file holding tower keyframe `index`, if the animation has that many frames.
    #[must_use]
    pub fn tower_frame(&self, index: u32) -> Option<PathBuf> {
        (index < self.frame_count)
            .then(|| self.tower_frames.join(format!("box_asset{index:04}.png")))
    }

    /// Number of keyframes in the tower capture animation.
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Size of the package sprite in pixels.
    #[must_use]
    pub const fn package_size(&self) -> FootprintSize {
        self.package_size
    }

    /// Size of the tower sprite, which doubles as its hit box.
    #[must_use]
    pub const fn tower_size(&self) -> FootprintSize {
        self.tower_size
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    package_sprite: String,
    tower_frames: String,
    frame_count: u32,
    package_size: [u32; 2],
    tower_size: [u32; 2],
}

fn footprint([width, height]: [u32; 2], field: &str) -> Result<FootprintSize> {
    let size = FootprintSize::new(width, height);
    if size.is_degenerate() {
        bail!("asset manifest `{field}` must be non-zero (received {width}x{height})");
    }
    Ok(size)
}
