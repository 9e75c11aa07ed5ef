use logistico_core::{Command, Event, PackageId, Waypoint, WorldPoint, CAPTURE_REWARD, TOWER_COST};
use logistico_world::{self as world, query, Factory, FactoryConfig};
use proptest::prelude::*;

fn place_tower(factory: &mut Factory, x: f64, y: f64, rate: u32, radius: f64) {
    let mut events = Vec::new();
    world::apply(
        factory,
        Command::PlaceTower {
            location: WorldPoint::new(x, y),
            rate,
            radius,
        },
        &mut events,
    );
}

fn tick(factory: &mut Factory, events: &mut Vec<Event>) {
    world::apply(factory, Command::UpdatePackages, events);
    world::apply(factory, Command::UpdateTowers, events);
}

#[test]
fn tower_captures_package_spawned_on_it() {
    let mut factory = Factory::new(999_999_999);
    place_tower(&mut factory, 0.0, 0.0, 2, 1.0);
    let mut events = Vec::new();
    factory.generate_package(&[Waypoint::new(0, 0)], &mut events);
    let baseline = query::money(&factory);

    for _ in 0..3 {
        factory.update_robots(&mut events);
    }

    assert_eq!(query::package_count(&factory), 0);
    assert_eq!(query::packed(&factory), 1);
    assert_eq!(query::money(&factory), baseline + CAPTURE_REWARD);
}

#[test]
fn exhausted_package_counts_as_failed() {
    let mut factory = Factory::new(0);
    let mut events = Vec::new();
    factory.generate_package(&[Waypoint::new(3, 3)], &mut events);

    factory.update_packages(&mut events);

    assert_eq!(query::package_count(&factory), 0);
    assert_eq!(query::failed(&factory), 1);
    assert_eq!(query::packed(&factory), 0);
}

#[test]
fn insufficient_funds_leave_factory_untouched() {
    let mut factory = Factory::new(50);
    place_tower(&mut factory, 100.0, 100.0, 300, 100.0);

    assert_eq!(query::tower_count(&factory), 0);
    assert_eq!(query::money(&factory), 50);
}

#[test]
fn package_walks_the_default_floor_to_failure() {
    let mut factory = Factory::new(0);
    let path = query::path(&factory).to_vec();
    let route_length: i32 = path
        .windows(2)
        .map(|pair| (pair[1].x() - pair[0].x()).abs() + (pair[1].y() - pair[0].y()).abs())
        .sum();
    let mut events = Vec::new();
    factory.generate_package(&path, &mut events);

    for step in 0..route_length {
        tick(&mut factory, &mut events);
        assert_eq!(query::package_count(&factory), 1, "package lost at step {step}");
    }
    let last = path[path.len() - 1];
    let snapshot = query::package_view(&factory).into_vec()[0];
    assert_eq!(snapshot.location, WorldPoint::from(last));

    tick(&mut factory, &mut events);
    assert_eq!(query::package_count(&factory), 0);
    assert_eq!(query::failed(&factory), 1);
}

#[test]
fn tower_on_path_intercepts_traffic() {
    let config = FactoryConfig::default()
        .with_starting_money(TOWER_COST)
        .with_path(vec![Waypoint::new(0, 0), Waypoint::new(200, 0)]);
    let mut factory = Factory::with_config(config).expect("valid config");
    place_tower(&mut factory, 100.0, 20.0, 5, 30.0);

    let path = query::path(&factory).to_vec();
    let mut events = Vec::new();
    for _ in 0..3 {
        factory.generate_package(&path, &mut events);
        for _ in 0..10 {
            tick(&mut factory, &mut events);
        }
    }
    for _ in 0..250 {
        tick(&mut factory, &mut events);
    }

    assert_eq!(query::packed(&factory) + query::failed(&factory), 3);
    assert!(query::packed(&factory) >= 1);
    assert_eq!(
        query::money(&factory),
        u64::from(query::packed(&factory)) * CAPTURE_REWARD
    );
    let captures = events
        .iter()
        .filter(|event| matches!(event, Event::PackageCaptured { .. }))
        .count();
    assert_eq!(captures, query::packed(&factory) as usize);
}

#[test]
fn packages_move_independently_of_removals() {
    let mut factory = Factory::new(0);
    let mut events = Vec::new();
    factory.generate_package(&[Waypoint::new(0, 0)], &mut events);
    factory.generate_package(&[Waypoint::new(0, 0), Waypoint::new(0, 10)], &mut events);
    factory.generate_package(&[Waypoint::new(5, 5)], &mut events);
    events.clear();

    factory.update_packages(&mut events);

    assert_eq!(
        events,
        vec![
            Event::PackageFailed {
                package: PackageId::new(0)
            },
            Event::PackageFailed {
                package: PackageId::new(2)
            },
        ]
    );
    let survivors = query::package_view(&factory).into_vec();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].location, WorldPoint::new(0.0, 1.0));
}

proptest! {
    #[test]
    fn straight_paths_converge_after_their_length(
        start_x in -500i32..500,
        start_y in -500i32..500,
        length in 1i32..200,
        horizontal in any::<bool>(),
        negative in any::<bool>(),
    ) {
        let delta = if negative { -length } else { length };
        let end = if horizontal {
            Waypoint::new(start_x + delta, start_y)
        } else {
            Waypoint::new(start_x, start_y + delta)
        };
        let mut factory = Factory::new(0);
        let mut events = Vec::new();
        factory.generate_package(&[Waypoint::new(start_x, start_y), end], &mut events);

        for _ in 0..length {
            factory.update_packages(&mut events);
            prop_assert_eq!(query::package_count(&factory), 1);
        }
        let snapshot = query::package_view(&factory).into_vec()[0];
        prop_assert_eq!(snapshot.location, WorldPoint::from(end));

        factory.update_packages(&mut events);
        prop_assert_eq!(query::package_count(&factory), 0);
        prop_assert_eq!(query::failed(&factory), 1);
    }
}
