//! Bridges the session's draw sink to a scene-based rendering backend.

use anyhow::Result;
use logistico_core::FootprintSize;
use logistico_rendering::{Hud, RenderingBackend, Scene};
use logistico_system_session::Presenter;
use logistico_world::{query, Factory};

/// Builds a [`Scene`] from the factory every tick and hands it to `B`.
#[derive(Debug)]
pub(crate) struct ScenePresenter<B> {
    backend: B,
    max_failed: u32,
    package_size: FootprintSize,
}

impl<B> ScenePresenter<B> {
    pub(crate) fn new(backend: B, max_failed: u32, package_size: FootprintSize) -> Self {
        Self {
            backend,
            max_failed,
            package_size,
        }
    }

    pub(crate) fn scene(&self, factory: &Factory) -> Scene {
        Scene::from_views(
            &query::package_view(factory),
            &query::tower_view(factory),
            query::path(factory),
            Hud::new(query::scoreboard(factory), self.max_failed),
            self.package_size,
        )
    }
}

impl<B: RenderingBackend> Presenter for ScenePresenter<B> {
    fn present(&mut self, factory: &Factory) -> Result<()> {
        let scene = self.scene(factory);
        self.backend.draw(&scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logistico_core::{Waypoint, WorldPoint};

    #[derive(Default)]
    struct Capture {
        scenes: Vec<Scene>,
    }

    impl RenderingBackend for Capture {
        fn draw(&mut self, scene: &Scene) -> Result<()> {
            self.scenes.push(scene.clone());
            Ok(())
        }
    }

    #[test]
    fn scene_reflects_factory_state() {
        let mut factory = Factory::new(300);
        let mut events = Vec::new();
        factory.generate_tower(WorldPoint::new(400.0, 400.0), 300, 100.0, &mut events);
        factory.generate_package(&[Waypoint::new(10, 10), Waypoint::new(20, 10)], &mut events);

        let mut presenter = ScenePresenter::new(Capture::default(), 10, FootprintSize::new(24, 24));
        presenter.present(&factory).expect("capture never fails");

        let scene = &presenter.backend.scenes[0];
        assert_eq!(scene.towers.len(), 1);
        assert_eq!(scene.packages.len(), 1);
        assert_eq!(scene.packages[0].sprite.left(), -2);
        assert_eq!(scene.path.len(), 8);
        assert_eq!(scene.hud.money, 200);
        assert_eq!(scene.hud.lives, 10);
    }
}
