//! Rendering backend that reports scenes through the log instead of a window.

use anyhow::Result;
use logistico_rendering::{AssetBundle, RenderingBackend, Scene};
use tracing::{debug, info};

/// Logs a HUD summary every `report_every` frames; zero disables reports.
#[derive(Debug)]
pub(crate) struct LogBackend {
    report_every: u64,
    frames: u64,
    assets: AssetBundle,
}

impl LogBackend {
    pub(crate) fn new(report_every: u64, assets: AssetBundle) -> Self {
        Self {
            report_every,
            frames: 0,
            assets,
        }
    }

    fn should_report(&self) -> bool {
        self.report_every != 0 && self.frames % self.report_every == 0
    }
}

impl RenderingBackend for LogBackend {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        self.frames += 1;
        if !self.should_report() {
            return Ok(());
        }

        let hud = scene.hud;
        info!(
            frame = self.frames,
            packages = scene.packages.len(),
            package_sprite = %self.assets.package_sprite().display(),
            towers = scene.towers.len(),
            packed = hud.packed,
            lives = hud.lives,
            money = hud.money,
            "frame"
        );
        for tower in &scene.towers {
            debug!(
                tower = tower.id.get(),
                sprite = ?self.assets.tower_frame(tower.frame),
                animating = tower.animating,
                "tower"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logistico_rendering::Hud;

    fn scene() -> Scene {
        Scene {
            packages: Vec::new(),
            towers: Vec::new(),
            path: Vec::new(),
            hud: Hud::default(),
        }
    }

    #[test]
    fn reports_on_every_nth_frame() {
        let mut backend = LogBackend::new(3, AssetBundle::default());
        let mut reported = Vec::new();
        for _ in 0..7 {
            backend.draw(&scene()).expect("logging never fails");
            reported.push(backend.should_report());
        }
        assert_eq!(
            reported,
            vec![false, false, true, false, false, true, false]
        );
    }

    #[test]
    fn zero_interval_never_reports() {
        let mut backend = LogBackend::new(0, AssetBundle::default());
        for _ in 0..5 {
            backend.draw(&scene()).expect("logging never fails");
            assert!(!backend.should_report());
        }
    }
}
