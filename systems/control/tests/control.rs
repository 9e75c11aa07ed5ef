use logistico_core::{Command, Event, Waypoint, WorldPoint};
use logistico_system_control::{Control, ControlInput, InputEvent, TowerBlueprint};
use logistico_world::{self as world, query, Factory};

const LEFT: InputEvent = InputEvent::MouseButtonDown { button: 1 };
const RIGHT: InputEvent = InputEvent::MouseButtonDown { button: 3 };

fn run_frame(factory: &mut Factory, events: Vec<InputEvent>, cursor: (i32, i32)) -> Vec<Event> {
    let control = Control::default();
    let input = ControlInput::new(events, Waypoint::from(cursor));
    let mut commands = Vec::new();
    control.handle(
        &input,
        query::placement_bounds(factory),
        |point| query::towers_at(factory, point),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(factory, command, &mut events);
    }
    events
}

fn towers_after_placing(events: Vec<InputEvent>, cursor: (i32, i32)) -> usize {
    let mut factory = Factory::new(99_999_999);
    let _ = run_frame(&mut factory, events, cursor);
    query::tower_count(&factory)
}

fn removed_from_two_towers(events: Vec<InputEvent>, cursor: (i32, i32)) -> usize {
    let mut factory = Factory::new(99_999_999);
    let mut setup = Vec::new();
    factory.generate_tower(WorldPoint::new(0.0, 0.0), 1, 1.0, &mut setup);
    factory.generate_tower(WorldPoint::new(400.0, 400.0), 1, 1.0, &mut setup);
    assert_eq!(query::tower_count(&factory), 2);

    let _ = run_frame(&mut factory, events, cursor);
    2 - query::tower_count(&factory)
}

#[test]
fn left_click_places_a_single_tower() {
    assert_eq!(towers_after_placing(vec![], (1, 1)), 0);
    assert_eq!(towers_after_placing(vec![LEFT], (1, 1)), 1);
    assert_eq!(towers_after_placing(vec![LEFT, LEFT], (1, 1)), 1);
    assert_eq!(towers_after_placing(vec![RIGHT], (0, 0)), 0);
    assert_eq!(
        towers_after_placing(vec![LEFT], (1000, 1000)),
        0,
        "clicks outside the floor must be ignored"
    );
}

#[test]
fn right_click_removes_towers_under_cursor() {
    assert_eq!(removed_from_two_towers(vec![RIGHT], (1, 1)), 1);
    assert_eq!(removed_from_two_towers(vec![RIGHT], (400, 400)), 1);
    assert_eq!(removed_from_two_towers(vec![RIGHT, RIGHT], (400, 400)), 1);
    assert_eq!(removed_from_two_towers(vec![RIGHT], (200, 200)), 0);
    assert_eq!(removed_from_two_towers(vec![RIGHT], (1000, 1000)), 0);
    assert_eq!(removed_from_two_towers(vec![InputEvent::KeyDown], (1, 1)), 0);
}

#[test]
fn placement_uses_the_blueprint() {
    let control = Control::new(TowerBlueprint {
        rate: 42,
        radius: 7.5,
    });
    let input = ControlInput::new(vec![LEFT], Waypoint::new(10, 20));
    let factory = Factory::new(0);
    let mut commands = Vec::new();
    control.handle(
        &input,
        query::placement_bounds(&factory),
        |_| Vec::new(),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            location: WorldPoint::new(10.0, 20.0),
            rate: 42,
            radius: 7.5,
        }],
        "left click should place a tower from the configured blueprint"
    );
}

#[test]
fn placement_on_bounds_edge_is_accepted() {
    assert_eq!(towers_after_placing(vec![LEFT], (800, 600)), 1);
    assert_eq!(towers_after_placing(vec![LEFT], (801, 600)), 0);
}

#[test]
fn default_blueprint_matches_standard_tower() {
    let blueprint = Control::default().blueprint();
    assert_eq!(blueprint.rate, 300);
    assert_eq!(blueprint.radius, 100.0);
}

#[test]
fn overlapping_towers_are_removed_together() {
    let mut factory = Factory::new(1_000);
    let mut setup = Vec::new();
    factory.generate_tower(WorldPoint::new(100.0, 100.0), 1, 1.0, &mut setup);
    factory.generate_tower(WorldPoint::new(110.0, 100.0), 1, 1.0, &mut setup);

    let events = run_frame(&mut factory, vec![RIGHT], (105, 100));

    assert_eq!(query::tower_count(&factory), 0);
    assert_eq!(query::money(&factory), 1_000);
    assert_eq!(events.len(), 2);
}
