use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Matrix4, Point3};

const POINT_SIZE: f32 = 2.0;

fn belt_color() -> Point3<f32> {
    Point3::new(0.55, 0.52, 0.48)
}

/// Draws the asteroid belt as a point cloud. The instance positions are
/// uploaded once; per frame only the shared model matrix changes, which is
/// how the whole belt revolves without touching five thousand transforms.
pub struct BeltRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    color: ShaderUniform<Point3<f32>>,
    point_size: ShaderUniform<f32>,
    // Data storage
    points: GPUVec<Point3<f32>>,
    frame: Matrix4<f32>,
}

impl BeltRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        BeltRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            model: shader
                .get_uniform::<Matrix4<f32>>("model")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            point_size: shader
                .get_uniform::<f32>("pointSize")
                .expect("Failed to get shader uniform."),
            shader,
            points: GPUVec::new(vec![], BufferType::Array, AllocationType::StaticDraw),
            frame: Matrix4::identity(),
        }
    }

    /// Upload the rock positions. The full instance matrices carry rotation
    /// and scale too, but a point sprite only needs the translation column.
    pub fn set_instances(&mut self, instances: &[Matrix4<f64>]) {
        let points: Vec<Point3<f32>> = instances
            .iter()
            .map(|m| {
                let t = m.fixed_slice::<3, 1>(0, 3);
                Point3::new(t[0] as f32, t[1] as f32, t[2] as f32)
            })
            .collect();
        self.points = GPUVec::new(points, BufferType::Array, AllocationType::StaticDraw);
    }

    pub fn set_frame(&mut self, frame: Matrix4<f32>) {
        self.frame = frame;
    }
}

impl Renderer for BeltRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        let count = self.points.len();
        if count == 0 {
            return;
        }

        self.shader.use_program();
        self.pos.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);
        self.model.upload(&self.frame);
        self.color.upload(&belt_color());
        self.point_size.upload(&POINT_SIZE);

        self.pos.bind_sub_buffer(&mut self.points, 0, 0);

        let ctxt = Context::get();
        ctxt.draw_arrays(Context::POINTS, 0, count as i32);

        self.pos.disable();
    }
}

/// Vertex shader used to display the belt points.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    uniform   mat4 model;
    uniform   mat4 proj;
    uniform   mat4 view;
    uniform   float pointSize;
    void main() {
        gl_Position = proj * view * model * vec4(position, 1.0);
        gl_PointSize = pointSize;
    }";

/// Fragment shader used to display the belt points.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3 color;
    void main() {
        gl_FragColor = vec4(color, 1.0);
    }";
