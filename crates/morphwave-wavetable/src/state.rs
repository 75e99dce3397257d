//! Saved-state versions and upgrades of older layouts.
//!
//! Every saved wavetable carries the version of the layout it was written
//! with. [`migrate`] walks the upgrade steps newer than that version in
//! order, rewriting the JSON in place, and stamps it with
//! [`FORMAT_VERSION`].

use crate::component::ComponentType;
use crate::encoding::{decode_f32, encode_f32, encode_pcm16};
use crate::error::{Result, StateError};
use morphwave_core::lerp;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Layout version written by this crate.
pub const FORMAT_VERSION: &str = "1.0.0";

/// A `major.minor.patch` layout version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    /// Major number.
    pub major: u32,
    /// Minor number.
    pub minor: u32,
    /// Patch number.
    pub patch: u32,
}

impl Version {
    /// Build a version from its parts.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version of a saved state. States without one predate versioning.
    pub fn of(state: &Value) -> Result<Self> {
        match state.get("version") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(text)) => text.parse(),
            Some(other) => Err(StateError::InvalidVersion(other.to_string())),
        }
    }
}

impl FromStr for Version {
    type Err = StateError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || StateError::InvalidVersion(text.to_string());
        let mut parts = text.trim().split('.');
        let mut next = || -> Result<u32> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

type Upgrade = fn(&mut Value) -> Result<()>;

const UPGRADES: [(Version, Upgrade); 6] = [
    (Version::new(0, 3, 3), name_component_types),
    (Version::new(0, 3, 7), encode_audio_arrays),
    (Version::new(0, 3, 8), add_remove_all_dc),
    (Version::new(0, 3, 9), reencode_audio_as_pcm16),
    (Version::new(0, 4, 7), add_full_normalize),
    (Version::new(0, 7, 7), nest_line_generators),
];

/// Upgrade `state` in place to [`FORMAT_VERSION`].
///
/// Returns the version the state was written with.
pub fn migrate(state: &mut Value) -> Result<Version> {
    let saved = Version::of(state)?;
    for (introduced, upgrade) in UPGRADES {
        if saved < introduced {
            upgrade(state)?;
        }
    }
    if let Some(object) = state.as_object_mut() {
        object.insert("version".into(), FORMAT_VERSION.into());
    }
    if saved < Version::new(0, 7, 7) {
        tracing::debug!(from = %saved, to = FORMAT_VERSION, "migrated wavetable state");
    }
    Ok(saved)
}

fn components_mut(state: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    state
        .get_mut("groups")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(|group| group.get_mut("components").and_then(Value::as_array_mut))
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn is_type(component: &Map<String, Value>, kind: ComponentType) -> bool {
    component.get("type").and_then(Value::as_str) == Some(kind.name())
}

fn name_component_types(state: &mut Value) -> Result<()> {
    for component in components_mut(state) {
        let Some(index) = component.get("type").and_then(Value::as_i64) else {
            continue;
        };
        let kind = ComponentType::from_legacy_index(index)
            .ok_or_else(|| StateError::UnknownComponent(index.to_string()))?;
        component.insert("type".into(), kind.name().into());
    }
    Ok(())
}

fn encode_audio_arrays(state: &mut Value) -> Result<()> {
    for component in components_mut(state) {
        let Some(Value::Array(samples)) = component.get("audio_file") else {
            continue;
        };
        let samples: Vec<f32> = samples
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<_>>()
            .ok_or_else(|| StateError::wrong_type("audio_file", "an array of numbers"))?;
        component.insert("audio_file".into(), encode_f32(&samples).into());
    }
    Ok(())
}

fn add_remove_all_dc(state: &mut Value) -> Result<()> {
    if let Some(object) = state.as_object_mut() {
        object.insert("remove_all_dc".into(), false.into());
    }
    Ok(())
}

fn reencode_audio_as_pcm16(state: &mut Value) -> Result<()> {
    for component in components_mut(state) {
        let Some(Value::String(encoded)) = component.get("audio_file") else {
            continue;
        };
        let samples = decode_f32(encoded)?;
        component.insert("audio_file".into(), encode_pcm16(&samples).into());
    }
    Ok(())
}

fn add_full_normalize(state: &mut Value) -> Result<()> {
    if let Some(object) = state.as_object_mut() {
        object.insert("full_normalize".into(), false.into());
    }
    Ok(())
}

// Older line sources stored points without the x = 0 and x = 1 boundary
// points, directly on the keyframe.
fn nest_line_generators(state: &mut Value) -> Result<()> {
    for component in components_mut(state) {
        if !is_type(component, ComponentType::LineSource) {
            continue;
        }
        if let Some(count) = component.get("num_points").and_then(Value::as_i64) {
            component.insert("num_points".into(), (count + 2).into());
        }
        let Some(keyframes) = component.get_mut("keyframes").and_then(Value::as_array_mut) else {
            continue;
        };
        for keyframe in keyframes.iter_mut().filter_map(Value::as_object_mut) {
            if keyframe.contains_key("line") {
                continue;
            }
            let line = boundary_line(keyframe)?;
            for key in ["points", "powers", "num_points", "smooth"] {
                keyframe.remove(key);
            }
            keyframe.insert("line".into(), line);
        }
    }
    Ok(())
}

fn boundary_line(keyframe: &Map<String, Value>) -> Result<Value> {
    let coords = number_list(keyframe, "points")?;
    let mut powers = number_list(keyframe, "powers")?;
    let count = keyframe
        .get("num_points")
        .and_then(Value::as_u64)
        .map_or(coords.len() / 2, |n| n as usize)
        .min(coords.len() / 2);
    powers.resize(count, 0.0);
    let points: Vec<(f32, f32)> = coords.chunks_exact(2).take(count).map(|c| (c[0], c[1])).collect();

    let boundary_y = match (points.first(), points.last()) {
        (Some(&(first_x, first_y)), Some(&(last_x, last_y))) => {
            let width = first_x + 1.0 - last_x;
            if width > 0.0 {
                lerp(last_y, first_y, (1.0 - last_x) / width)
            } else {
                first_y
            }
        }
        _ => 0.5,
    };

    let mut flat = vec![0.0, boundary_y];
    flat.extend(points.iter().flat_map(|&(x, y)| [x, y]));
    flat.extend([1.0, boundary_y]);
    let mut new_powers = vec![0.0];
    new_powers.extend(powers);
    new_powers.push(0.0);

    let smooth = keyframe.get("smooth").cloned().unwrap_or(Value::Bool(false));
    Ok(json!({
        "num_points": count + 2,
        "points": flat,
        "powers": new_powers,
        "smooth": smooth,
        "name": "",
    }))
}

fn number_list(keyframe: &Map<String, Value>, key: &str) -> Result<Vec<f32>> {
    match keyframe.get(key) {
        None => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<_>>()
            .ok_or_else(|| StateError::wrong_type(key, "an array of numbers")),
        Some(_) => Err(StateError::wrong_type(key, "an array of numbers")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode_pcm16;

    fn state(version: Option<&str>, component: Value) -> Value {
        let mut state = json!({ "groups": [ { "components": [component] } ] });
        if let Some(version) = version {
            state["version"] = version.into();
        }
        state
    }

    fn component(state: &Value) -> &Value {
        &state["groups"][0]["components"][0]
    }

    #[test]
    fn test_version_parse_and_order() {
        let version: Version = "0.7.7".parse().unwrap();
        assert_eq!(version, Version::new(0, 7, 7));
        assert!(Version::new(0, 3, 9) < Version::new(0, 4, 0));
        assert_eq!("1.2".parse::<Version>().unwrap(), Version::new(1, 2, 0));
        assert!(matches!("1.x.0".parse::<Version>(), Err(StateError::InvalidVersion(_))));
        assert!(matches!("1.2.3.4".parse::<Version>(), Err(StateError::InvalidVersion(_))));
        assert_eq!(Version::new(0, 4, 7).to_string(), "0.4.7");
    }

    #[test]
    fn test_unversioned_state_gets_every_upgrade() {
        let mut data = state(
            None,
            json!({ "type": 2, "audio_file": [0.0, 0.5, -1.0], "keyframes": [] }),
        );
        let saved = migrate(&mut data).unwrap();
        assert_eq!(saved, Version::default());
        assert_eq!(data["version"], FORMAT_VERSION);
        assert_eq!(data["remove_all_dc"], false);
        assert_eq!(data["full_normalize"], false);

        let component = component(&data);
        assert_eq!(component["type"], "Audio File Source");
        let audio = decode_pcm16(component["audio_file"].as_str().unwrap()).unwrap();
        assert_eq!(audio.len(), 3);
        assert!((audio[1] - 0.5).abs() < 1e-4);
        assert!((audio[2] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_recent_state_keeps_flags() {
        let mut data = state(Some("0.5.0"), json!({ "type": "Wave Source", "keyframes": [] }));
        data["remove_all_dc"] = true.into();
        data["full_normalize"] = true.into();
        migrate(&mut data).unwrap();
        assert_eq!(data["remove_all_dc"], true);
        assert_eq!(data["full_normalize"], true);
    }

    #[test]
    fn test_float_audio_reencoded() {
        let encoded = encode_f32(&[0.25, -0.25]);
        let mut data = state(
            Some("0.3.8"),
            json!({ "type": "Audio File Source", "audio_file": encoded, "keyframes": [] }),
        );
        migrate(&mut data).unwrap();
        let audio = decode_pcm16(component(&data)["audio_file"].as_str().unwrap()).unwrap();
        assert!((audio[0] - 0.25).abs() < 1e-4);
        assert!((audio[1] + 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_line_points_gain_boundaries() {
        let mut data = state(
            Some("0.7.6"),
            json!({
                "type": "Line Source",
                "num_points": 2,
                "keyframes": [{
                    "position": 0,
                    "num_points": 2,
                    "points": [0.25, 1.0, 0.75, 0.0],
                    "powers": [2.0, -1.0],
                    "smooth": true,
                }],
            }),
        );
        migrate(&mut data).unwrap();
        let component = component(&data);
        assert_eq!(component["num_points"], 4);
        let keyframe = &component["keyframes"][0];
        assert!(keyframe.get("points").is_none());
        let line = &keyframe["line"];
        assert_eq!(line["num_points"], 4);
        // halfway along the wrap segment from (0.75, 0) to (1.25, 1)
        let points: Vec<f64> = line["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(points, vec![0.0, 0.5, 0.25, 1.0, 0.75, 0.0, 1.0, 0.5]);
        assert_eq!(line["powers"], json!([0.0, 2.0, -1.0, 0.0]));
        assert_eq!(line["smooth"], true);
    }

    #[test]
    fn test_bad_legacy_type_is_an_error() {
        let mut data = state(None, json!({ "type": 42, "keyframes": [] }));
        assert!(matches!(migrate(&mut data), Err(StateError::UnknownComponent(_))));
    }
}
