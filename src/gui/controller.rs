use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};
use log::info;

use super::view::View;
use crate::scene::SceneComposer;

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_PATHS: Key = Key::O;

pub struct Controller {
    timestep: f64,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            // One simulated hour per real second, at the nominal framerate
            timestep: 1.0 / 60.0,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, composer: &mut SceneComposer, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => {
                Self::cycle_focus(composer, 1);
                view.focus_changed(composer);
            }
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => {
                Self::cycle_focus(composer, -1);
                view.focus_changed(composer);
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.timestep *= 2.0;
                info!("timestep is {} h/frame", self.timestep);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.timestep /= 2.0;
                info!("timestep is {} h/frame", self.timestep);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                composer.clock_mut().toggle_pause();
            }
            WindowEvent::Key(KEY_TOGGLE_PATHS, Action::Press, _) => {
                composer.toggle_orbit_paths();
            }
            _ => {}
        }
    }

    fn cycle_focus(composer: &mut SceneComposer, step: isize) {
        let names: Vec<String> = composer
            .all_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return;
        }
        let current = names
            .iter()
            .position(|n| n == composer.focus())
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(names.len() as isize) as usize;
        // The name comes straight out of the scene, so selection can't fail.
        let _ = composer.set_focus(&names[next]);
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
