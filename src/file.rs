use std::fs;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

use crate::scene::belt::scatter_instances;
use crate::scene::{
    BodyKind, OrbitalBody, OrbitalParameters, RingSpec, SceneComposer, SceneError, SimClock,
    Surface,
};

#[derive(Debug, Error)]
pub enum BodyFileError {
    #[error("could not read body file {path:?}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: missing field {field:?}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: bad value {value:?} for field {field:?}")]
    BadValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown body kind {kind:?}")]
    UnknownKind { line: usize, kind: String },

    #[error("line {line}: parent {parent:?} is not defined above this line")]
    UnknownParent { line: usize, parent: String },

    #[error("line {line}: {source}")]
    Scene {
        line: usize,
        #[source]
        source: SceneError,
    },
}

/// Read a whitespace-table body file into a composer ready to render.
///
/// Columns are `name kind parent distance` followed by kind-specific fields:
/// star rows carry `scale tilt orbital-period spin-period intensity`, planet
/// rows (`planet`, `daynight`, `ringed`) carry `scale tilt orbital-period
/// spin-period`, and belt rows carry `orbital-period count threshold`.
/// Parent `-` means top-level; anything else attaches the row as a child of
/// the named earlier row.
pub fn read_file(path: &Path, rng: &mut impl Rng) -> Result<SceneComposer, BodyFileError> {
    let text = fs::read_to_string(path).map_err(|source| BodyFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text, rng)
}

pub fn parse_str(text: &str, rng: &mut impl Rng) -> Result<SceneComposer, BodyFileError> {
    let mut bodies: Vec<OrbitalBody> = Vec::new();

    // Read lines, skipping the header
    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let mut fields = line.split_ascii_whitespace();

        macro_rules! next_str {
            ($field:expr) => {
                fields.next().ok_or(BodyFileError::MissingField {
                    line: line_no,
                    field: $field,
                })?
            };
        }

        macro_rules! next_num {
            ($field:expr, $ty:ty) => {{
                let raw = next_str!($field);
                raw.parse::<$ty>().map_err(|_| BodyFileError::BadValue {
                    line: line_no,
                    field: $field,
                    value: raw.to_owned(),
                })?
            }};
        }

        let name = next_str!("name");
        let kind = next_str!("kind");
        let parent = next_str!("parent");
        let distance = next_num!("distance", f64);

        let body = match kind {
            "star" => {
                let params = OrbitalParameters::new(
                    distance,
                    next_num!("scale", f64),
                    next_num!("tilt", f64),
                    next_num!("orbital-period", f64),
                    next_num!("spin-period", f64),
                    rng,
                );
                let intensity = next_num!("intensity", f64);
                OrbitalBody::new(
                    name,
                    params,
                    BodyKind::Star {
                        light_intensity: intensity,
                    },
                )
            }
            "planet" | "daynight" | "ringed" => {
                let params = OrbitalParameters::new(
                    distance,
                    next_num!("scale", f64),
                    next_num!("tilt", f64),
                    next_num!("orbital-period", f64),
                    next_num!("spin-period", f64),
                    rng,
                );
                let surface = if kind == "daynight" {
                    Surface::DayNightBlend
                } else {
                    Surface::Plain
                };
                let ring = if kind == "ringed" {
                    Some(RingSpec::saturn())
                } else {
                    None
                };
                OrbitalBody::new(name, params, BodyKind::Planet { surface, ring })
            }
            "belt" => {
                let orbital_period = next_num!("orbital-period", f64);
                let count = next_num!("count", usize);
                let threshold = next_num!("threshold", f64);
                // The belt does not spin on itself, only around the star; a
                // spin period equal to the orbital one keeps the parameters
                // valid without mattering for rendering.
                let params =
                    OrbitalParameters::new(distance, 1.0, 0.0, orbital_period, orbital_period, rng);
                OrbitalBody::new(
                    name,
                    params,
                    BodyKind::Belt {
                        instances: scatter_instances(count, distance, threshold, rng),
                    },
                )
            }
            other => {
                return Err(BodyFileError::UnknownKind {
                    line: line_no,
                    kind: other.to_owned(),
                })
            }
        }
        .map_err(|source| BodyFileError::Scene {
            line: line_no,
            source,
        })?;

        if parent == "-" {
            bodies.push(body);
        } else {
            let slot = bodies
                .iter_mut()
                .find_map(|b| b.find_mut(parent))
                .ok_or_else(|| BodyFileError::UnknownParent {
                    line: line_no,
                    parent: parent.to_owned(),
                })?;
            slot.add_child(body);
        }
    }

    let mut composer = SceneComposer::new(SimClock::new());
    for body in bodies {
        // The line number is gone by now, but duplicate names and a second
        // star are file-authoring errors all the same.
        composer
            .add_body(body)
            .map_err(|source| BodyFileError::Scene { line: 0, source })?;
    }
    composer
        .validate()
        .map_err(|source| BodyFileError::Scene { line: 0, source })?;
    Ok(composer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SMALL_SCENE: &str = "\
name      kind     parent  distance  ...
sun       star     -       0.0       1.0   0.0   645.11   645.11  10.0
earth     daynight -       4.5       0.1   24.0  365.25   23.93
moon      planet   earth   0.3       0.01  0.0   693.97   693.97
saturn    ringed   -       26.0      0.3   27.0  10757.0  10.65
asteroids belt     -       11.0      360.0 40    1.0
";

    #[test]
    fn test_parses_a_full_scene() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let composer = parse_str(SMALL_SCENE, &mut rng).unwrap();

        assert_eq!(
            composer.body_names(),
            vec!["sun", "earth", "saturn", "asteroids"]
        );
        assert_eq!(composer.focus(), "sun");

        let moon = composer.find("moon").unwrap();
        assert_eq!(moon.params.distance_from_parent, 0.3);
        assert_eq!(composer.find("earth").unwrap().children().len(), 1);

        let saturn = composer.find("saturn").unwrap();
        assert!(matches!(
            saturn.kind,
            BodyKind::Planet { ring: Some(_), .. }
        ));

        match &composer.find("asteroids").unwrap().kind {
            BodyKind::Belt { instances } => assert_eq!(instances.len(), 40),
            other => panic!("expected a belt, got {:?}", other),
        }

        assert_eq!(composer.star().unwrap().light_intensity(), Some(10.0));
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let text = "header\nx comet - 1.0 1.0 0.0 10.0 10.0\n";
        let err = parse_str(text, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, BodyFileError::UnknownKind { line: 2, .. }));
    }

    #[test]
    fn test_unknown_parent_is_an_error() {
        let text = "header\nmoon planet nowhere 0.3 0.01 0.0 693.97 693.97\n";
        let err = parse_str(text, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, BodyFileError::UnknownParent { .. }));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let text = "header\nsun star - zero 1.0 0.0 10.0 10.0 10.0\n";
        let err = parse_str(text, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            BodyFileError::BadValue {
                field: "distance",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let text = "header\nsun star - 0.0 1.0\n";
        let err = parse_str(text, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, BodyFileError::MissingField { .. }));
    }

    #[test]
    fn test_starless_file_fails_validation() {
        let text = "header\nearth planet - 4.5 0.1 24.0 365.25 23.93\n";
        let err = parse_str(text, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            BodyFileError::Scene {
                source: SceneError::WrongStarCount(0),
                ..
            }
        ));
    }
}
