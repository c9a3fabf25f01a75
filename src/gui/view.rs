use std::collections::HashMap;
use std::path::PathBuf;

use kiss3d::camera::Camera;
use kiss3d::light::Light;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use log::warn;
use nalgebra::{Isometry3, Point3, Translation3};

use super::camera::FocusCamera;
use super::controller::Controller;
use super::renderers::CompoundRenderer;
use crate::scene::{
    BeltDraw, BodyDraw, BodyKind, DrawTarget, OrbitalBody, PathDraw, RingDraw, SceneComposer,
};

const STAR_FALLBACK_COLOR: (f32, f32, f32) = (1.0, 0.85, 0.3);
const BODY_FALLBACK_COLOR: (f32, f32, f32) = (0.5, 0.5, 0.55);

fn ring_color() -> Point3<f32> {
    Point3::new(0.76, 0.69, 0.57)
}

fn path_color() -> Point3<f32> {
    Point3::new(0.35, 0.35, 0.35)
}

pub struct View {
    // Object state
    body_spheres: HashMap<String, SceneNode>,
    // Camera
    camera: FocusCamera,
    // The translation that brings the focus body to the origin, refreshed
    // each frame before the scene is submitted.
    focus_shift: Isometry3<f64>,
    // Misc
    renderer: CompoundRenderer,
}

impl View {
    pub fn new(composer: &SceneComposer, window: &mut Window) -> Self {
        let camera = FocusCamera::new(60.0);

        let mut body_spheres = HashMap::new();
        let mut renderer = CompoundRenderer::new();
        for body in composer.bodies() {
            Self::create_scene_objects(body, window, &mut body_spheres, &mut renderer);
        }

        let mut view = Self {
            body_spheres,
            camera,
            focus_shift: Isometry3::identity(),
            renderer,
        };
        view.focus_changed(composer);

        view
    }

    fn create_scene_objects(
        body: &OrbitalBody,
        window: &mut Window,
        body_spheres: &mut HashMap<String, SceneNode>,
        renderer: &mut CompoundRenderer,
    ) {
        match &body.kind {
            BodyKind::Belt { instances } => {
                renderer.belt_mut().set_instances(instances);
            }
            _ => {
                // Unit sphere; the actual size comes in per frame as a scale.
                let mut sphere = window.add_sphere(1.0);
                Self::apply_surface(&mut sphere, body);
                body_spheres.insert(body.name.clone(), sphere);
            }
        }

        for child in body.children() {
            Self::create_scene_objects(child, window, body_spheres, renderer);
        }
    }

    /// Texture the sphere from `images/2k_<name>.jpg`, falling back to a flat
    /// color when the file isn't there (so the scene still runs from a bare
    /// checkout with no assets).
    fn apply_surface(sphere: &mut SceneNode, body: &OrbitalBody) {
        let path = PathBuf::from(format!("images/2k_{}.jpg", body.name));
        if path.exists() {
            sphere.set_texture_from_file(&path, &body.name);
            return;
        }

        let (r, g, b) = if body.is_star() {
            STAR_FALLBACK_COLOR
        } else {
            BODY_FALLBACK_COLOR
        };
        sphere.set_color(r, g, b);
        warn!("no texture found for {:?}, using a flat color", body.name);
    }

    /// Re-fit the camera to the new focus body so zooming in doesn't clip
    /// through its surface.
    pub fn focus_changed(&mut self, composer: &SceneComposer) {
        if let Some(body) = composer.find(composer.focus()) {
            let min_dist = f64::max(body.params.scale.x * 2.5, 0.05);
            self.camera.set_min_distance(min_dist as f32);
        }
    }

    // the big boy
    pub fn prerender_scene(
        &mut self,
        window: &mut Window,
        composer: &SceneComposer,
        controller: &Controller,
    ) {
        // Bring the focus body to the origin; the camera always looks there.
        let focus = composer.focus_world_position();
        self.focus_shift = Translation3::from(-focus.coords).into();

        // The star lights the whole scene, from its shifted position.
        if let Some(star) = composer.star() {
            let light_pos: Point3<f32> =
                nalgebra::convert(self.focus_shift * star.world_position());
            window.set_light(Light::Absolute(light_pos));
        }

        let shift = self.focus_shift;
        composer.submit(&shift, self);

        // Draw text
        use nalgebra::Point2;
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(composer),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(composer, controller),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn left_hand_text(&self, composer: &SceneComposer) -> String {
        format!(
            "Focused on: {}
Orbit paths: {}",
            composer.focus(),
            if composer.orbit_paths_enabled() {
                "on"
            } else {
                "off"
            },
        )
    }

    fn time_summary_text(&self, composer: &SceneComposer, controller: &Controller) -> String {
        format!(
            "Time: {}{}
Timestep: {} h/frame
FPS: {:.0}",
            format_hours(composer.clock().now()),
            if composer.clock().is_paused() {
                " (paused)"
            } else {
                ""
            },
            controller.timestep(),
            controller.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

impl DrawTarget for View {
    fn draw_body(&mut self, draw: BodyDraw) {
        let sphere = match self.body_spheres.get_mut(draw.name) {
            Some(sphere) => sphere,
            None => return,
        };

        let placement: Isometry3<f32> = nalgebra::convert(self.focus_shift * draw.transform.rigid);
        sphere.set_local_transformation(placement);
        sphere.set_local_scale(
            draw.transform.scale.x as f32,
            draw.transform.scale.y as f32,
            draw.transform.scale.z as f32,
        );
    }

    fn draw_ring(&mut self, draw: RingDraw) {
        let placement: Isometry3<f32> = nalgebra::convert(self.focus_shift * draw.transform.rigid);
        self.renderer.draw_ring(
            placement,
            draw.radius as f32,
            draw.thickness as f32,
            ring_color(),
        );
    }

    fn draw_belt(&mut self, draw: BeltDraw) {
        let frame: Isometry3<f32> = nalgebra::convert(self.focus_shift * draw.frame);
        self.renderer.belt_mut().set_frame(frame.to_homogeneous());
    }

    fn draw_orbit_path(&mut self, draw: PathDraw) {
        let placement: Isometry3<f32> = nalgebra::convert(self.focus_shift * draw.transform);
        self.renderer
            .draw_circle(placement, draw.radius as f32, path_color());
    }
}

fn format_hours(hours: f64) -> String {
    let mut total_hours = hours as u64;
    let n_days = 24;
    let n_years = 365 * n_days;

    macro_rules! count_and_remainder {
        ($variable:ident, $divisor:expr) => {
            let $variable = total_hours / $divisor;
            total_hours %= $divisor;
        };
    }

    count_and_remainder!(years, n_years);
    count_and_remainder!(days, n_days);

    format!("{}y, {}d, {}h", years, days, total_hours)
}
