use nalgebra::{Isometry3, Matrix4, Point3};

use log::debug;

use crate::math::transform::RenderTransform;

use super::body::{BodyKind, OrbitalBody, Surface};
use super::clock::SimClock;
use super::SceneError;

/// The star's shading contract, pulled fresh each frame. `position` is in
/// view space, since that is the space the shading model works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniforms {
    pub position: Point3<f64>,
    pub intensity: f64,
}

pub struct BodyDraw<'a> {
    pub name: &'a str,
    pub transform: RenderTransform,
    pub surface: Surface,
    /// None exactly when this body is the star itself.
    pub light: Option<LightUniforms>,
}

pub struct RingDraw<'a> {
    pub name: &'a str,
    pub transform: RenderTransform,
    pub radius: f64,
    pub thickness: f64,
    pub light: Option<LightUniforms>,
}

pub struct BeltDraw<'a> {
    pub name: &'a str,
    /// The one shared rotation for the whole belt this frame.
    pub frame: Isometry3<f64>,
    pub instances: &'a [Matrix4<f64>],
}

pub struct PathDraw<'a> {
    pub name: &'a str,
    /// Radius of the orbit the guide traces.
    pub radius: f64,
    pub transform: Isometry3<f64>,
}

/// The seam to the external renderer. The gui implements this on top of
/// kiss3d; tests implement it with a recorder.
pub trait DrawTarget {
    fn draw_body(&mut self, draw: BodyDraw);
    fn draw_ring(&mut self, draw: RingDraw);
    fn draw_belt(&mut self, draw: BeltDraw);
    fn draw_orbit_path(&mut self, draw: PathDraw);
}

/// Owns the scene: the body tree, the clock, the focus selection and the
/// orbit-path flag. One instance per scene, passed explicitly to the render
/// driver; there is no global state.
#[derive(Debug)]
pub struct SceneComposer {
    // Insertion order; rendering iterates this order every frame.
    bodies: Vec<OrbitalBody>,
    clock: SimClock,
    focus: String,
    show_orbit_paths: bool,
}

impl SceneComposer {
    pub fn new(clock: SimClock) -> Self {
        SceneComposer {
            bodies: Vec::new(),
            clock,
            focus: String::new(),
            show_orbit_paths: true,
        }
    }

    /// Add a top-level body (with its whole subtree). Names must be unique
    /// across the scene, and at most one star may be present. The first body
    /// added becomes the initial focus.
    pub fn add_body(&mut self, body: OrbitalBody) -> Result<(), SceneError> {
        let mut incoming = Vec::new();
        collect_names(&body, &mut incoming);
        for name in &incoming {
            if self.find(name).is_some() {
                return Err(SceneError::DuplicateName(name.to_string()));
            }
        }
        if body.is_star() && self.star().is_some() {
            return Err(SceneError::WrongStarCount(2));
        }

        if self.focus.is_empty() {
            self.focus = body.name.clone();
        }
        self.bodies.push(body);
        Ok(())
    }

    /// Check the scene is complete enough to render: exactly one star.
    pub fn validate(&self) -> Result<(), SceneError> {
        let stars = self.bodies.iter().filter(|b| b.is_star()).count();
        if stars != 1 {
            return Err(SceneError::WrongStarCount(stars));
        }
        Ok(())
    }

    /// Top-level bodies, in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &OrbitalBody> {
        self.bodies.iter()
    }

    /// Top-level body names, in insertion order (the GUI's selection list).
    pub fn body_names(&self) -> Vec<&str> {
        self.bodies.iter().map(|b| b.name.as_str()).collect()
    }

    /// Every name in the scene, depth-first in insertion order. This is the
    /// order focus cycling walks through.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for body in &self.bodies {
            collect_names(body, &mut names);
        }
        names
    }

    pub fn find(&self, name: &str) -> Option<&OrbitalBody> {
        self.bodies.iter().find_map(|b| b.find(name))
    }

    pub fn star(&self) -> Option<&OrbitalBody> {
        self.bodies.iter().find(|b| b.is_star())
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    pub fn advance(&mut self, dt: f64) {
        self.clock.advance(dt);
    }

    /// Select the camera-focus body. Unknown names are a checked error and
    /// leave the previous selection in place.
    pub fn set_focus(&mut self, name: &str) -> Result<(), SceneError> {
        if self.find(name).is_none() {
            return Err(SceneError::UnknownBody(name.to_string()));
        }
        debug!("focus -> {}", name);
        self.focus = name.to_string();
        Ok(())
    }

    pub fn focus(&self) -> &str {
        &self.focus
    }

    pub fn orbit_paths_enabled(&self) -> bool {
        self.show_orbit_paths
    }

    pub fn set_orbit_paths(&mut self, enabled: bool) {
        self.show_orbit_paths = enabled;
    }

    pub fn toggle_orbit_paths(&mut self) {
        self.show_orbit_paths = !self.show_orbit_paths;
    }

    /// The per-frame compute pass: refresh every body's anchor and cached
    /// placement at the clock's current time, parents before children.
    pub fn update(&mut self) {
        let time = self.clock.now();
        for body in &mut self.bodies {
            body.compute_tree(time);
        }
    }

    /// World position of the focus body, from the anchor computed by this
    /// frame's `update` (never a stale one -- call after `update`).
    pub fn focus_world_position(&self) -> Point3<f64> {
        self.find(&self.focus)
            .expect("focus body is validated on selection and bodies are never removed")
            .world_position()
    }

    /// The per-frame draw pass. Walks bodies in insertion order handing each
    /// one's transform and uniforms to `target`; afterwards, if enabled,
    /// submits the static orbit-path guides.
    pub fn submit(&self, view: &Isometry3<f64>, target: &mut dyn DrawTarget) {
        let time = self.clock.now();
        let light = self.star().map(|star| LightUniforms {
            position: star
                .light_position_in(view)
                .expect("star always exposes a light position"),
            intensity: star
                .light_intensity()
                .expect("star always exposes an intensity"),
        });

        for body in &self.bodies {
            submit_subtree(body, time, light, target);
        }

        if self.show_orbit_paths {
            for body in &self.bodies {
                submit_paths(body, &Isometry3::identity(), target);
            }
        }
    }
}

fn collect_names<'a>(body: &'a OrbitalBody, out: &mut Vec<&'a str>) {
    out.push(&body.name);
    for child in body.children() {
        collect_names(child, out);
    }
}

fn submit_subtree(
    body: &OrbitalBody,
    time: f64,
    light: Option<LightUniforms>,
    target: &mut dyn DrawTarget,
) {
    match &body.kind {
        BodyKind::Star { .. } => {
            // The star lights itself; no uniforms to receive.
            target.draw_body(BodyDraw {
                name: &body.name,
                transform: body.render_transform(time),
                surface: Surface::Plain,
                light: None,
            });
        }
        BodyKind::Planet { surface, ring } => {
            target.draw_body(BodyDraw {
                name: &body.name,
                transform: body.render_transform(time),
                surface: *surface,
                light,
            });
            if let Some(ring) = ring {
                target.draw_ring(RingDraw {
                    name: &body.name,
                    transform: body.ring_transform(time, ring),
                    radius: ring.radius,
                    thickness: ring.thickness,
                    light,
                });
            }
        }
        BodyKind::Belt { instances } => {
            target.draw_belt(BeltDraw {
                name: &body.name,
                frame: body.belt_frame(time),
                instances,
            });
        }
    }

    for child in body.children() {
        submit_subtree(child, time, light, target);
    }
}

fn submit_paths(body: &OrbitalBody, parent_anchor: &Isometry3<f64>, target: &mut dyn DrawTarget) {
    // Stars and belts have no orbit guide; planets and moons do.
    if let BodyKind::Planet { .. } = body.kind {
        target.draw_orbit_path(PathDraw {
            name: &body.name,
            radius: body.params.distance_from_parent,
            transform: OrbitalBody::path_transform(parent_anchor),
        });
    }

    let anchor = *body.anchor();
    for child in body.children() {
        submit_paths(child, &anchor, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::belt::scatter_instances;
    use crate::scene::body::RingSpec;
    use crate::scene::params::OrbitalParameters;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Recorder {
        bodies: Vec<(String, RenderTransform, Option<LightUniforms>)>,
        rings: Vec<String>,
        belts: Vec<(String, usize)>,
        paths: Vec<String>,
    }

    impl DrawTarget for Recorder {
        fn draw_body(&mut self, draw: BodyDraw) {
            self.bodies
                .push((draw.name.to_string(), draw.transform, draw.light));
        }

        fn draw_ring(&mut self, draw: RingDraw) {
            self.rings.push(draw.name.to_string());
        }

        fn draw_belt(&mut self, draw: BeltDraw) {
            self.belts.push((draw.name.to_string(), draw.instances.len()));
        }

        fn draw_orbit_path(&mut self, draw: PathDraw) {
            self.paths.push(draw.name.to_string());
        }
    }

    fn test_scene() -> SceneComposer {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut composer = SceneComposer::new(SimClock::new());

        let sun = OrbitalBody::new(
            "sun",
            OrbitalParameters::new(0.0, 1.0, 0.0, 645.11, 645.11, &mut rng),
            BodyKind::Star {
                light_intensity: 10.0,
            },
        )
        .unwrap();
        composer.add_body(sun).unwrap();

        let mut earth = OrbitalBody::new(
            "earth",
            OrbitalParameters::new(4.5, 0.1, 24.0, 365.25, 23.93, &mut rng)
                .with_phase_offset(0.0),
            BodyKind::Planet {
                surface: Surface::DayNightBlend,
                ring: None,
            },
        )
        .unwrap();
        earth.add_child(
            OrbitalBody::new(
                "moon",
                OrbitalParameters::new(0.3, 0.01, 0.0, 693.97, 693.97, &mut rng)
                    .with_phase_offset(0.0),
                BodyKind::Planet {
                    surface: Surface::Plain,
                    ring: None,
                },
            )
            .unwrap(),
        );
        composer.add_body(earth).unwrap();

        let saturn = OrbitalBody::new(
            "saturn",
            OrbitalParameters::new(26.0, 0.3, 27.0, 10757.0, 10.65, &mut rng),
            BodyKind::Planet {
                surface: Surface::Plain,
                ring: Some(RingSpec::saturn()),
            },
        )
        .unwrap();
        composer.add_body(saturn).unwrap();

        let belt = OrbitalBody::new(
            "asteroids",
            OrbitalParameters::new(11.0, 1.0, 0.0, 360.0, 360.0, &mut rng),
            BodyKind::Belt {
                instances: scatter_instances(50, 11.0, 1.0, &mut rng),
            },
        )
        .unwrap();
        composer.add_body(belt).unwrap();

        composer
    }

    #[test]
    fn test_single_star_enforced() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut composer = test_scene();
        let second = OrbitalBody::new(
            "sun2",
            OrbitalParameters::new(0.0, 1.0, 0.0, 10.0, 10.0, &mut rng),
            BodyKind::Star {
                light_intensity: 1.0,
            },
        )
        .unwrap();
        assert!(matches!(
            composer.add_body(second),
            Err(SceneError::WrongStarCount(2))
        ));
        composer.validate().unwrap();
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut composer = test_scene();
        let double = OrbitalBody::new(
            "earth",
            OrbitalParameters::new(1.0, 1.0, 0.0, 10.0, 10.0, &mut rng),
            BodyKind::Planet {
                surface: Surface::Plain,
                ring: None,
            },
        )
        .unwrap();
        assert!(matches!(
            composer.add_body(double),
            Err(SceneError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_focus_defaults_to_first_body() {
        let composer = test_scene();
        assert_eq!(composer.focus(), "sun");
    }

    #[test]
    fn test_set_focus_unknown_is_checked() {
        let mut composer = test_scene();
        composer.set_focus("earth").unwrap();
        let err = composer.set_focus("pluto").unwrap_err();
        assert!(matches!(err, SceneError::UnknownBody(_)));
        // Failed selection leaves the old focus in place
        assert_eq!(composer.focus(), "earth");
    }

    #[test]
    fn test_focus_position_is_current_frame() {
        let mut composer = test_scene();
        composer.set_focus("earth").unwrap();

        composer.advance(10.0);
        composer.update();
        let position = composer.focus_world_position();

        // Recompute what earth's anchor must be at t = 10 independently.
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut expected = OrbitalBody::new(
            "check",
            OrbitalParameters::new(4.5, 0.1, 24.0, 365.25, 23.93, &mut rng)
                .with_phase_offset(0.0),
            BodyKind::Planet {
                surface: Surface::Plain,
                ring: None,
            },
        )
        .unwrap();
        expected.compute_tree(10.0);

        assert_relative_eq!(position, expected.world_position(), epsilon = 1e-12);
    }

    #[test]
    fn test_submission_order_is_insertion_order() {
        let mut composer = test_scene();
        composer.update();

        let mut recorder = Recorder::default();
        composer.submit(&Isometry3::identity(), &mut recorder);

        let names: Vec<_> = recorder.bodies.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, vec!["sun", "earth", "moon", "saturn"]);
        assert_eq!(recorder.belts, vec![("asteroids".to_string(), 50)]);
        assert_eq!(recorder.rings, vec!["saturn".to_string()]);
    }

    #[test]
    fn test_light_reaches_planets_but_not_star() {
        let mut composer = test_scene();
        composer.update();

        let mut recorder = Recorder::default();
        composer.submit(&Isometry3::identity(), &mut recorder);

        for (name, _, light) in &recorder.bodies {
            if name == "sun" {
                assert!(light.is_none());
            } else {
                let light = light.expect("planets receive the star's uniforms");
                assert_eq!(light.intensity, 10.0);
                // Identity view, star at origin
                assert_relative_eq!(light.position, Point3::origin());
            }
        }
    }

    #[test]
    fn test_path_toggle_only_affects_guides() {
        let mut composer = test_scene();
        composer.update();

        let mut with_paths = Recorder::default();
        composer.submit(&Isometry3::identity(), &mut with_paths);
        assert_eq!(with_paths.paths, vec!["earth", "moon", "saturn"]);

        composer.toggle_orbit_paths();
        let mut without = Recorder::default();
        composer.submit(&Isometry3::identity(), &mut without);
        assert!(without.paths.is_empty());

        // Body transforms are untouched by the toggle
        for (a, b) in with_paths.bodies.iter().zip(without.bodies.iter()) {
            assert_eq!(a.1, b.1);
        }
    }

    #[test]
    fn test_pause_freezes_the_whole_scene() {
        let mut composer = test_scene();
        composer.set_focus("earth").unwrap();

        composer.advance(5.0);
        composer.update();
        let before = composer.focus_world_position();

        composer.clock_mut().pause();
        composer.advance(100.0);
        composer.update();
        assert_eq!(composer.focus_world_position(), before);
    }
}
