use nalgebra::{Matrix4, Translation3};
use rand::Rng;

use crate::math::transform::{rotate_x, rotate_y, rotate_z};

// Vertical half-extent of the belt and the size range of a single rock.
// These are properties of the rock mesh / belt look, not tunable per scene.
const Y_BAND: f64 = 0.25;
const SCALE_MIN: f64 = 0.005;
const SCALE_MAX: f64 = 0.01;

/// Scatter `count` rock transforms around a ring of the given radius.
///
/// The angular seed for rock `i` is just `i` radians: deterministic, and
/// smears the rocks around the ring without the clumping a fresh random
/// angle per rock tends to produce. Position jitters within `threshold` of
/// the nominal ring point on x/z and within a fixed band on y; orientation
/// and scale are fully random per rock.
///
/// The returned buffer is computed once and never touched again; the belt as
/// a whole moves only through one shared frame rotation applied uniformly at
/// draw time.
pub fn scatter_instances(
    count: usize,
    radius: f64,
    threshold: f64,
    rng: &mut impl Rng,
) -> Vec<Matrix4<f64>> {
    let mut instances = Vec::with_capacity(count);

    for i in 0..count {
        let angle = i as f64;
        let nominal_x = radius * angle.cos();
        let nominal_z = radius * angle.sin();

        // Inclusive so a zero threshold degenerates to the nominal point
        // instead of an empty-range panic.
        let translation = Translation3::new(
            rng.gen_range(nominal_x - threshold..=nominal_x + threshold),
            rng.gen_range(-Y_BAND..=Y_BAND),
            rng.gen_range(nominal_z - threshold..=nominal_z + threshold),
        );
        let spin = rotate_z(rng.gen_range(0.0..360.0))
            * rotate_y(rng.gen_range(0.0..360.0))
            * rotate_x(rng.gen_range(0.0..360.0));
        let scale = rng.gen_range(SCALE_MIN..SCALE_MAX);

        instances.push(
            translation.to_homogeneous() * spin.to_homogeneous() * Matrix4::new_scaling(scale),
        );
    }

    instances
}
