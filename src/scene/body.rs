use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::math::transform::{rotate_x, rotate_y, translate_x, RenderTransform};

use super::params::OrbitalParameters;
use super::SceneError;

/// Which shading contract a planet's surface wants from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// One diffuse texture.
    Plain,
    /// Day, night and cloud textures blended by sun exposure (earth).
    DayNightBlend,
}

/// The flattened torus around a ringed planet. Proportions are fixed
/// properties of the ring look, carried here so the draw submission has them
/// in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSpec {
    /// Extra swivel around the orbit axis before the planet's tilt applies.
    pub swivel: f64,
    /// Ring centerline radius, in body-local units.
    pub radius: f64,
    /// Half-thickness of the annulus.
    pub thickness: f64,
    /// Non-uniform squash that flattens the torus into a disc.
    pub scale: Vector3<f64>,
}

impl RingSpec {
    pub fn saturn() -> Self {
        RingSpec {
            swivel: -45.0,
            radius: 0.5,
            thickness: 0.1,
            scale: Vector3::new(1.0, 1.0, 0.01),
        }
    }
}

/// Closed set of body roles. Capabilities hang off the variant, not off a
/// subclass chain: the composer switches on this when it submits draws.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// The scene's light source and root. Its orbital-period parameter is
    /// not used for placement (it sits at the origin); only its spin is.
    Star { light_intensity: f64 },
    Planet {
        surface: Surface,
        ring: Option<RingSpec>,
    },
    /// A rigid ring of scattered rock instances; see [`super::belt`].
    Belt { instances: Vec<Matrix4<f64>> },
}

// The base sphere/rock meshes are modelled pole-up; this swings the pole onto
// the orbit axis. A constant of the mesh assets, not a parameter.
const MESH_ALIGN_DEGREES: f64 = -90.0;

/// One celestial object: star, planet (optionally ringed, optionally with
/// moon children), or asteroid belt.
///
/// The only mutable state is the cached `anchor`, the body's orbit placement
/// around its parent *without* tilt, spin or scale. It is recomputed from
/// scratch in every frame's compute pass and read back within the same frame
/// by children and by the light-position query, so those dependents always
/// see pure orbital placement, never the local attitude.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    pub name: String,
    pub params: OrbitalParameters,
    pub kind: BodyKind,
    children: Vec<OrbitalBody>,
    anchor: Isometry3<f64>,
}

impl OrbitalBody {
    pub fn new(
        name: impl Into<String>,
        params: OrbitalParameters,
        kind: BodyKind,
    ) -> Result<Self, SceneError> {
        let name = name.into();

        // A zero period would put NaNs into every transform downstream, so
        // it's a hard construction error rather than something to clamp.
        if params.spin_period == 0.0 {
            return Err(SceneError::ZeroPeriod { name, which: "spin" });
        }
        match kind {
            BodyKind::Star { .. } => {
                if params.distance_from_parent != 0.0 {
                    return Err(SceneError::StarNotAtOrigin {
                        name,
                        distance: params.distance_from_parent,
                    });
                }
            }
            _ => {
                if params.orbital_period == 0.0 {
                    return Err(SceneError::ZeroPeriod {
                        name,
                        which: "orbital",
                    });
                }
            }
        }

        Ok(OrbitalBody {
            name,
            params,
            kind,
            children: Vec::new(),
            anchor: Isometry3::identity(),
        })
    }

    /// Attach a dependent body (e.g. a moon) orbiting this one. The child's
    /// parameters are relative to this body's anchor.
    pub fn add_child(&mut self, child: OrbitalBody) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[OrbitalBody] {
        &self.children
    }

    pub fn is_star(&self) -> bool {
        matches!(self.kind, BodyKind::Star { .. })
    }

    /// The orbit placement cached by the most recent compute pass.
    pub fn anchor(&self) -> &Isometry3<f64> {
        &self.anchor
    }

    /// World position from the cached anchor.
    pub fn world_position(&self) -> Point3<f64> {
        Point3::from(self.anchor.translation.vector)
    }

    /// Compute this body's full render transform at `time`, given the
    /// parent's anchor, and cache the fresh anchor for same-frame dependents.
    ///
    /// Pure in time and parameters: two calls with the same `time` and parent
    /// anchor yield identical output.
    pub fn compute_world_transform(
        &mut self,
        time: f64,
        parent_anchor: &Isometry3<f64>,
    ) -> RenderTransform {
        self.anchor = parent_anchor * self.local_anchor(time);
        self.render_transform(time)
    }

    /// The full render transform at `time`, composed against the cached
    /// anchor: tilt, spin, mesh alignment, scale. Read-only; the anchor must
    /// have been computed for this frame already.
    pub fn render_transform(&self, time: f64) -> RenderTransform {
        let attitude = rotate_x(self.params.axial_tilt)
            * rotate_y(self.params.spin_angle(time))
            * rotate_x(MESH_ALIGN_DEGREES);
        RenderTransform::new(self.anchor * attitude, self.params.scale)
    }

    /// Recompute anchors and transforms for this body and all descendants.
    /// Parents first: children compose against the anchor written this frame.
    pub fn compute_tree(&mut self, time: f64) {
        self.compute_subtree(time, &Isometry3::identity());
    }

    fn compute_subtree(&mut self, time: f64, parent_anchor: &Isometry3<f64>) {
        self.compute_world_transform(time, parent_anchor);
        let anchor = self.anchor;
        for child in &mut self.children {
            child.compute_subtree(time, &anchor);
        }
    }

    /// Orbit placement around the parent at `time`: rotate around the orbit
    /// axis, then step out to orbital radius. A star contributes nothing (it
    /// is the root; its children would otherwise inherit a spurious twist).
    fn local_anchor(&self, time: f64) -> Isometry3<f64> {
        if self.is_star() {
            return Isometry3::identity();
        }
        rotate_y(self.params.orbit_angle(time)) * translate_x(self.params.distance_from_parent)
    }

    /// The rigid frame the belt instances share: the orbit rotation alone.
    /// Instances already carry the ring radius in their own transforms.
    pub fn belt_frame(&self, time: f64) -> Isometry3<f64> {
        Isometry3::from_parts(
            nalgebra::Translation3::identity(),
            rotate_y(self.params.orbit_angle(time)),
        )
    }

    /// The ring's render transform: anchor, extra swivel, then the same
    /// tilt/spin/align chain as the planet, with the flattening squash.
    pub fn ring_transform(&self, time: f64, ring: &RingSpec) -> RenderTransform {
        let attitude = rotate_y(ring.swivel)
            * rotate_x(self.params.axial_tilt)
            * rotate_y(self.params.spin_angle(time))
            * rotate_x(MESH_ALIGN_DEGREES);
        RenderTransform::new(self.anchor * attitude, ring.scale)
    }

    /// The static orbit-path guide: centered on the parent, oriented only by
    /// the mesh alignment. It traces the whole orbit, so it neither spins
    /// nor orbits.
    pub fn path_transform(parent_anchor: &Isometry3<f64>) -> Isometry3<f64> {
        parent_anchor * rotate_x(MESH_ALIGN_DEGREES)
    }

    /// The star's light position in view space, evaluated fresh from the
    /// current camera transform. Returns None for non-stars.
    pub fn light_position_in(&self, view: &Isometry3<f64>) -> Option<Point3<f64>> {
        match self.kind {
            BodyKind::Star { .. } => Some(view * self.anchor * Point3::origin()),
            _ => None,
        }
    }

    pub fn light_intensity(&self) -> Option<f64> {
        match self.kind {
            BodyKind::Star { light_intensity } => Some(light_intensity),
            _ => None,
        }
    }

    /// Depth-first lookup by name, self included.
    pub fn find(&self, name: &str) -> Option<&OrbitalBody> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut OrbitalBody> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }
}
