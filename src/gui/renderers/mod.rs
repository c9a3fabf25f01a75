use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Isometry3, Point3};

use self::belt_renderer::BeltRenderer;

mod belt_renderer;

/// Everything drawn outside the scene graph: orbit-path circles, ring discs,
/// and the asteroid belt point cloud.
pub struct CompoundRenderer {
    line_renderer: LineRenderer,
    belt_renderer: BeltRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            line_renderer: LineRenderer::new(),
            belt_renderer: BeltRenderer::new(),
        }
    }

    pub fn belt_mut(&mut self) -> &mut BeltRenderer {
        &mut self.belt_renderer
    }

    /// Queue a circle of the given radius, traced in the local xy plane of
    /// `transform`. Lasts one frame.
    pub fn draw_circle(&mut self, transform: Isometry3<f32>, radius: f32, color: Point3<f32>) {
        const NUM_SEGMENTS: usize = 128;

        let f = |theta: f32| transform * Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0);

        let mut prev_pt = None;
        for i in 0..=NUM_SEGMENTS {
            let theta = std::f32::consts::TAU * (i as f32) / (NUM_SEGMENTS as f32);
            let pt = f(theta);
            if let Some(prev_pt) = prev_pt {
                self.line_renderer.draw_line(prev_pt, pt, color);
            }
            prev_pt = Some(pt);
        }
    }

    /// Queue an annulus as a handful of concentric circles spanning
    /// `radius` plus or minus `thickness`.
    pub fn draw_ring(
        &mut self,
        transform: Isometry3<f32>,
        radius: f32,
        thickness: f32,
        color: Point3<f32>,
    ) {
        const NUM_CIRCLES: usize = 5;

        for i in 0..NUM_CIRCLES {
            let u = (i as f32) / ((NUM_CIRCLES - 1) as f32);
            let r = radius - thickness + 2.0 * thickness * u;
            self.draw_circle(transform, r, color);
        }
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
        self.belt_renderer.render(pass, camera);
    }
}
