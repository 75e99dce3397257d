//! One signal chain of components.

use crate::component::{ComponentType, WaveSource, WavetableComponent};
use crate::error::{Result, StateError};
use crate::json::array_field;
use morphwave_spectral::{PredefinedWaveFrames, Shape, WaveFrame};
use serde_json::{Value, json};

/// Ordered components rendered in sequence: normally a source first, then
/// modifiers each working on what the previous stage left in the frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WavetableGroup {
    components: Vec<WavetableComponent>,
}

impl WavetableGroup {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a single wave source holding a saw at
    /// position 0.
    pub fn load_default_group(&mut self) {
        let mut source = WaveSource::new();
        source.insert_frame(0, PredefinedWaveFrames::get(Shape::Saw));
        self.components.clear();
        self.components.push(source.into());
    }

    /// Components in render order.
    pub fn components(&self) -> &[WavetableComponent] {
        &self.components
    }

    /// Component at `index`.
    pub fn component(&self, index: usize) -> Option<&WavetableComponent> {
        self.components.get(index)
    }

    /// Component at `index`, mutably.
    pub fn component_mut(&mut self, index: usize) -> Option<&mut WavetableComponent> {
        self.components.get_mut(index)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when the group has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append a component. Returns its index.
    pub fn add_component(&mut self, component: impl Into<WavetableComponent>) -> usize {
        self.components.push(component.into());
        self.components.len() - 1
    }

    /// Insert a component at `index` (clamped to the end).
    pub fn insert_component(&mut self, index: usize, component: impl Into<WavetableComponent>) {
        let index = index.min(self.components.len());
        self.components.insert(index, component.into());
    }

    /// Remove and return the component at `index`.
    pub fn remove_component(&mut self, index: usize) -> Option<WavetableComponent> {
        (index < self.components.len()).then(|| self.components.remove(index))
    }

    /// Move the component at `from` to `to`.
    pub fn move_component(&mut self, from: usize, to: usize) {
        if from >= self.components.len() {
            return;
        }
        let component = self.components.remove(from);
        let to = to.min(self.components.len());
        self.components.insert(to, component);
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Render every component at `position` into `frame`, in order.
    pub fn render(&self, frame: &mut WaveFrame, position: f32) {
        for component in &self.components {
            component.render(frame, position);
        }
    }

    /// Largest last-keyframe position over the components.
    pub fn last_keyframe_position(&self) -> i32 {
        self.components
            .iter()
            .map(WavetableComponent::last_keyframe_position)
            .max()
            .unwrap_or(0)
    }

    /// True when any component is a Shepard tone source.
    pub fn is_shepard_tone(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.component_type() == ComponentType::ShepardToneSource)
    }

    /// Saved form.
    pub fn state_to_json(&self) -> Value {
        let components: Vec<Value> = self
            .components
            .iter()
            .map(WavetableComponent::state_to_json)
            .collect();
        json!({ "components": components })
    }

    /// Restore from the saved form.
    ///
    /// Components of unknown type are skipped with a warning so the rest of
    /// the group still loads.
    pub fn json_to_state(&mut self, data: &Value) -> Result<()> {
        self.components.clear();
        for component_data in array_field(data, "components")? {
            match WavetableComponent::from_json(component_data) {
                Ok(component) => self.components.push(component),
                Err(StateError::UnknownComponent(name)) => {
                    tracing::warn!("skipping unknown wavetable component '{name}'");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, FrequencyFilterModifier, ShepardToneSource};

    #[test]
    fn test_default_group_renders_saw() {
        let mut group = WavetableGroup::new();
        group.load_default_group();
        let mut frame = WaveFrame::new();
        group.render(&mut frame, 100.0);
        assert_eq!(frame.time_domain, PredefinedWaveFrames::get(Shape::Saw).time_domain);
        assert_eq!(group.last_keyframe_position(), 0);
    }

    #[test]
    fn test_modifiers_follow_source() {
        let mut group = WavetableGroup::new();
        group.load_default_group();
        let mut filter = FrequencyFilterModifier::new();
        filter.insert_new_keyframe(0);
        filter.insert_new_keyframe(200);
        group.add_component(filter);
        assert_eq!(group.len(), 2);
        assert_eq!(group.last_keyframe_position(), 200);

        let mut frame = WaveFrame::new();
        group.render(&mut frame, 0.0);
        assert!(frame.frequency_domain[200].norm() < 1e-2);
    }

    #[test]
    fn test_move_and_remove() {
        let mut group = WavetableGroup::new();
        group.load_default_group();
        group.add_component(FrequencyFilterModifier::new());
        group.move_component(1, 0);
        assert_eq!(
            group.component(0).map(WavetableComponent::component_type),
            Some(ComponentType::FrequencyFilter)
        );
        assert!(group.remove_component(5).is_none());
        assert!(group.remove_component(0).is_some());
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_shepard_detection() {
        let mut group = WavetableGroup::new();
        group.load_default_group();
        assert!(!group.is_shepard_tone());
        group.add_component(ShepardToneSource::new());
        assert!(group.is_shepard_tone());
    }

    #[test]
    fn test_unknown_components_are_skipped() {
        let mut group = WavetableGroup::new();
        group.load_default_group();
        let mut data = group.state_to_json();
        if let Some(components) = data["components"].as_array_mut() {
            components.push(json!({ "type": "Wave Mangler", "keyframes": [] }));
        }
        let mut restored = WavetableGroup::new();
        restored.json_to_state(&data).unwrap();
        assert_eq!(restored.len(), 1);
    }
}
