//! TOML game configuration accepted by `--config`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use logistico_core::Waypoint;
use logistico_rendering::AssetBundle;
use logistico_system_control::TowerBlueprint;
use logistico_system_session::DEFAULT_MAX_FAILED;
use logistico_system_spawning::{ExponentialGenerator, Generator, PackageSource};
use logistico_world::FactoryConfig;
use serde::Deserialize;

/// Everything needed to assemble a session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) starting_money: u64,
    pub(crate) max_failed: u32,
    pub(crate) generator: GeneratorConfig,
    pub(crate) tower: TowerConfig,
    pub(crate) path: Option<Vec<[i32; 2]>>,
    pub(crate) assets: Option<AssetsConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: FactoryConfig::default().starting_money,
            max_failed: DEFAULT_MAX_FAILED,
            generator: GeneratorConfig::default(),
            tower: TowerConfig::default(),
            path: None,
            assets: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum GeneratorKind {
    Exponential,
    Modulo,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GeneratorConfig {
    pub(crate) kind: GeneratorKind,
    pub(crate) gen_rate: f64,
    pub(crate) proportion: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::Exponential,
            gen_rate: 200.0,
            proportion: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TowerConfig {
    pub(crate) rate: u32,
    pub(crate) radius: f64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        let blueprint = TowerBlueprint::default();
        Self {
            rate: blueprint.rate,
            radius: blueprint.radius,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AssetsConfig {
    pub(crate) manifest: PathBuf,
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid game config at {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse game config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let GeneratorConfig {
            kind,
            gen_rate,
            proportion,
        } = self.generator;
        if !gen_rate.is_finite() || gen_rate < 0.0 {
            bail!("generator gen_rate must be a non-negative number (received {gen_rate})");
        }
        match kind {
            GeneratorKind::Modulo if gen_rate.fract() != 0.0 => {
                bail!("modulo generator gen_rate must be a whole number of ticks (received {gen_rate})")
            }
            GeneratorKind::Exponential if !(proportion > 0.0 && proportion <= 1.0) => {
                bail!("exponential generator proportion must lie in (0, 1] (received {proportion})")
            }
            _ => {}
        }
        if !(self.tower.radius.is_finite() && self.tower.radius >= 0.0) {
            bail!(
                "tower radius must be a non-negative number (received {})",
                self.tower.radius
            );
        }
        if matches!(&self.path, Some(path) if path.is_empty()) {
            bail!("path override must contain at least one waypoint");
        }
        Ok(())
    }

    /// Loads the configured asset manifest, resolving it against `base_dir`.
    pub(crate) fn asset_bundle(&self, base_dir: &Path) -> Result<AssetBundle> {
        match &self.assets {
            Some(assets) => AssetBundle::load(base_dir.join(&assets.manifest)),
            None => Ok(AssetBundle::default()),
        }
    }

    pub(crate) fn factory_config(&self, assets: &AssetBundle) -> FactoryConfig {
        let mut config = FactoryConfig {
            tower_footprint: assets.tower_size(),
            animation_frames: assets.frame_count(),
            ..FactoryConfig::default()
        }
        .with_starting_money(self.starting_money);
        if let Some(path) = &self.path {
            config = config.with_path(path.iter().map(|&[x, y]| Waypoint::new(x, y)).collect());
        }
        config
    }

    pub(crate) fn package_source(&self) -> Box<dyn PackageSource> {
        let GeneratorConfig {
            kind,
            gen_rate,
            proportion,
        } = self.generator;
        match kind {
            GeneratorKind::Exponential => Box::new(ExponentialGenerator::new(gen_rate, proportion)),
            GeneratorKind::Modulo => Box::new(Generator::new(gen_rate as u64)),
        }
    }

    pub(crate) fn blueprint(&self) -> TowerBlueprint {
        TowerBlueprint {
            rate: self.tower.rate,
            radius: self.tower.radius,
        }
    }
}
