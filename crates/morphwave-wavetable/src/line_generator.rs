//! Piecewise curve drawn through user-placed points.
//!
//! Points live in `[0, 1]²` with `y = 0` at the top, so the curve value at a
//! point is `1 - y`. Each point carries the power of the segment that starts
//! at it; the segment after the last point wraps around to the first, which
//! keeps the curve continuous as a loop.

use crate::error::Result;
use crate::json::{array_field, bool_or, f32_array, i32_field};
use morphwave_core::{lerp, power_scale};
use serde_json::{Value, json};
use std::f32::consts::PI;

/// Upper bound on points per line.
pub const MAX_LINE_POINTS: usize = 100;

/// A looping curve through `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGenerator {
    points: Vec<(f32, f32)>,
    powers: Vec<f32>,
    smooth: bool,
    name: String,
}

impl LineGenerator {
    /// A triangle: low at both ends, high in the middle.
    pub fn new() -> Self {
        let mut line = Self {
            points: Vec::new(),
            powers: Vec::new(),
            smooth: false,
            name: String::new(),
        };
        line.init_triangle();
        line
    }

    /// Reset to a triangle.
    pub fn init_triangle(&mut self) {
        self.set_points(&[(0.0, 1.0), (0.5, 0.0), (1.0, 1.0)], "Triangle");
    }

    /// Reset to a square.
    pub fn init_square(&mut self) {
        self.set_points(
            &[(0.0, 1.0), (0.0, 0.0), (0.5, 0.0), (0.5, 1.0), (1.0, 1.0)],
            "Square",
        );
    }

    /// Reset to a rising saw.
    pub fn init_saw_up(&mut self) {
        self.set_points(&[(0.0, 1.0), (1.0, 0.0)], "Saw Up");
    }

    /// Reset to a falling saw.
    pub fn init_saw_down(&mut self) {
        self.set_points(&[(0.0, 0.0), (1.0, 1.0)], "Saw Down");
    }

    /// Reset to `num_points` points evenly spaced on a flat line at mid height.
    pub fn init_linear(&mut self, num_points: usize) {
        let num_points = num_points.clamp(2, MAX_LINE_POINTS);
        let points: Vec<(f32, f32)> = (0..num_points)
            .map(|i| (i as f32 / (num_points - 1) as f32, 0.5))
            .collect();
        self.set_points(&points, "Linear");
    }

    fn set_points(&mut self, points: &[(f32, f32)], name: &str) {
        self.points = points.to_vec();
        self.powers = vec![0.0; points.len()];
        self.smooth = false;
        self.name = name.to_string();
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point at `index`.
    pub fn point(&self, index: usize) -> (f32, f32) {
        self.points[index]
    }

    /// Move the point at `index`.
    pub fn set_point(&mut self, index: usize, point: (f32, f32)) {
        self.points[index] = (point.0.clamp(0.0, 1.0), point.1.clamp(0.0, 1.0));
    }

    /// Power of the segment starting at `index`.
    pub fn power(&self, index: usize) -> f32 {
        self.powers[index]
    }

    /// Set the power of the segment starting at `index`.
    pub fn set_power(&mut self, index: usize, power: f32) {
        self.powers[index] = power;
    }

    /// Insert a point (with a straight segment) before `index`.
    pub fn add_point(&mut self, index: usize, point: (f32, f32)) {
        if self.points.len() >= MAX_LINE_POINTS {
            return;
        }
        let index = index.min(self.points.len());
        self.points.insert(index, point);
        self.powers.insert(index, 0.0);
    }

    /// Remove the point at `index`, keeping at least one.
    pub fn remove_point(&mut self, index: usize) {
        if self.points.len() > 1 && index < self.points.len() {
            self.points.remove(index);
            self.powers.remove(index);
        }
    }

    /// Whether segments ease in and out.
    pub fn smooth(&self) -> bool {
        self.smooth
    }

    /// Turn segment easing on or off.
    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Curve value (`1 - y`) at `x` in `[0, 1]`.
    pub fn value_at(&self, x: f32) -> f32 {
        let count = self.points.len();
        if count == 0 {
            return 0.0;
        }
        if count == 1 {
            return 1.0 - self.points[0].1;
        }

        let next = self.points.partition_point(|p| p.0 <= x);
        let (start, end, start_x, end_x, power) = if next == 0 {
            // before the first point: tail of the wrap segment
            let last = self.points[count - 1];
            let first = self.points[0];
            (last.1, first.1, last.0 - 1.0, first.0, self.powers[count - 1])
        } else if next == count {
            let last = self.points[count - 1];
            let first = self.points[0];
            (last.1, first.1, last.0, first.0 + 1.0, self.powers[count - 1])
        } else {
            let a = self.points[next - 1];
            let b = self.points[next];
            (a.1, b.1, a.0, b.0, self.powers[next - 1])
        };

        let width = end_x - start_x;
        let mut t = if width > 0.0 {
            ((x - start_x) / width).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if self.smooth {
            t = 0.5 - 0.5 * (PI * t).cos();
        }
        1.0 - lerp(start, end, power_scale(t, power))
    }

    /// Sample the curve at `out.len()` evenly spaced positions over `[0, 1)`.
    pub fn render(&self, out: &mut [f32]) {
        let len = out.len() as f32;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(i as f32 / len);
        }
    }

    /// Blend point-by-point between two lines.
    ///
    /// Lines with different point counts cannot be blended; the nearer one
    /// is copied instead.
    pub fn interpolate(&mut self, from: &LineGenerator, to: &LineGenerator, t: f32) {
        if from.points.len() != to.points.len() {
            self.clone_from(if t < 0.5 { from } else { to });
            return;
        }
        self.points.clear();
        self.points.extend(from.points.iter().zip(&to.points).map(|(a, b)| {
            (lerp(a.0, b.0, t), lerp(a.1, b.1, t))
        }));
        self.powers.clear();
        self.powers
            .extend(from.powers.iter().zip(&to.powers).map(|(a, b)| lerp(*a, *b, t)));
        self.smooth = if t < 0.5 { from.smooth } else { to.smooth };
        self.name.clone_from(if t < 0.5 { &from.name } else { &to.name });
    }

    /// Saved form.
    pub fn state_to_json(&self) -> Value {
        let points: Vec<f32> = self.points.iter().flat_map(|&(x, y)| [x, y]).collect();
        json!({
            "num_points": self.points.len(),
            "points": points,
            "powers": self.powers,
            "smooth": self.smooth,
            "name": self.name,
        })
    }

    /// Restore from the saved form.
    pub fn json_to_state(&mut self, data: &Value) -> Result<()> {
        let num_points = i32_field(data, "num_points")?.max(0) as usize;
        let coords = f32_array(data, "points")?;
        let mut powers = if array_field(data, "powers").is_ok() {
            f32_array(data, "powers")?
        } else {
            Vec::new()
        };

        let num_points = num_points.min(coords.len() / 2).min(MAX_LINE_POINTS);
        self.points = coords
            .chunks_exact(2)
            .take(num_points)
            .map(|c| (c[0], c[1]))
            .collect();
        powers.resize(num_points, 0.0);
        self.powers = powers;
        self.smooth = bool_or(data, "smooth", false);
        self.name = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(())
    }
}

impl Default for LineGenerator {
    fn default() -> Self {
        Self::new()
    }
}
