use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::scene::SceneComposer;

mod camera;
mod controller;
mod renderers;
mod view;

pub struct Simulation {
    composer: SceneComposer,
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(composer: SceneComposer, window: &mut Window) -> Self {
        let view = View::new(&composer, window);
        Self {
            composer,
            view,
            controller: Controller::new(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller
                .process_event(event, &mut self.composer, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        self.composer.advance(self.controller.timestep());
        self.composer.update();
        self.view
            .prerender_scene(window, &self.composer, &self.controller);
        self.controller.increment_frame_counter();
    }
}
