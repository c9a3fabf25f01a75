use std::path::Path;

use approx::assert_relative_eq;
use nalgebra::Point3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use solar_orrery::file::read_file;
use solar_orrery::scene::{BodyKind, SceneComposer};

fn load_default_scene() -> SceneComposer {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    read_file(Path::new("solar-bodies.txt"), &mut rng).expect("default body table should load")
}

#[test]
fn test_default_table_loads_the_whole_system() {
    let composer = load_default_scene();

    assert_eq!(
        composer.body_names(),
        vec![
            "sun", "mercury", "venus", "earth", "mars", "asteroids", "jupiter", "saturn",
            "uranus", "neptune",
        ]
    );

    // The moon is not top-level; it hangs off the earth.
    let earth = composer.find("earth").unwrap();
    assert_eq!(earth.children().len(), 1);
    assert_eq!(earth.children()[0].name, "moon");

    let star = composer.star().unwrap();
    assert_eq!(star.name, "sun");
    assert_eq!(star.light_intensity(), Some(10.0));

    match &composer.find("asteroids").unwrap().kind {
        BodyKind::Belt { instances } => assert_eq!(instances.len(), 5000),
        other => panic!("expected a belt, got {:?}", other),
    }

    assert!(matches!(
        composer.find("saturn").unwrap().kind,
        BodyKind::Planet { ring: Some(_), .. }
    ));
}

/// Step the clock through a full earth year in day-sized increments and check
/// the earth comes back to where it started.
#[test]
fn test_earth_returns_after_one_year() {
    let mut composer = load_default_scene();
    composer.update();
    let start = composer.find("earth").unwrap().world_position();

    let steps = 365;
    for _ in 0..steps {
        composer.advance(365.25 / steps as f64);
        composer.update();
    }

    let end = composer.find("earth").unwrap().world_position();
    assert_relative_eq!(start, end, epsilon = 1e-6);

    // And it never left its orbital radius.
    assert_relative_eq!(end.coords.norm(), 4.5, epsilon = 1e-9);
    assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
}

#[test]
fn test_moon_stays_near_earth() {
    let mut composer = load_default_scene();

    for _ in 0..100 {
        composer.advance(7.3);
        composer.update();

        let earth = composer.find("earth").unwrap().world_position();
        let moon = composer.find("moon").unwrap().world_position();
        assert_relative_eq!((moon - earth).norm(), 0.3, epsilon = 1e-9);
    }
}

#[test]
fn test_sun_anchors_the_scene() {
    let mut composer = load_default_scene();
    composer.advance(1234.5);
    composer.update();

    assert_relative_eq!(
        composer.find("sun").unwrap().world_position(),
        Point3::origin()
    );
}

#[test]
fn test_focus_cycles_through_every_body() {
    let mut composer = load_default_scene();
    composer.update();

    // Eleven bodies in the table, moon included.
    let names: Vec<String> = composer
        .all_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    assert_eq!(names.len(), 11);
    assert!(names.contains(&"moon".to_string()));

    for name in &names {
        composer.set_focus(name).unwrap();
        assert_eq!(composer.focus(), name);
        // The focus position is always defined, even for the belt.
        let _ = composer.focus_world_position();
    }
}

#[test]
fn test_same_seed_reproduces_the_layout() {
    let mut a = load_default_scene();
    let mut b = load_default_scene();
    a.advance(100.0);
    b.advance(100.0);
    a.update();
    b.update();

    for name in ["mercury", "venus", "earth", "jupiter"] {
        assert_eq!(
            a.find(name).unwrap().world_position(),
            b.find(name).unwrap().world_position()
        );
    }
}
