//! Keyframes and the shared interpolation dispatch.
//!
//! A component stores its parameter sets in a [`KeyframeTrack`], sorted by
//! frame position. Rendering an arbitrary position asks the track to blend
//! the two keyframes around it into a scratch parameter set; the blend rules
//! per parameter set come from [`KeyframeData`], the choice of neighbours and
//! the blend amount from [`KeyframeTrack::interpolate`].

use morphwave_core::cubic_tween;

/// Frame positions available to keyframes: `0..NUM_OSCILLATOR_WAVE_FRAMES`.
pub const NUM_OSCILLATOR_WAVE_FRAMES: i32 = 257;

/// How a component blends between neighbouring keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationStyle {
    /// Hold the keyframe at or before the position.
    None,
    /// Straight blend between the two bounding keyframes.
    #[default]
    Linear,
    /// Spacing-aware cubic blend through four keyframes.
    Cubic,
}

impl InterpolationStyle {
    /// Decode the integer stored in saved state. Unknown codes fall back to linear.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => InterpolationStyle::None,
            2 => InterpolationStyle::Cubic,
            _ => InterpolationStyle::Linear,
        }
    }

    /// Integer stored in saved state.
    pub fn index(self) -> i64 {
        match self {
            InterpolationStyle::None => 0,
            InterpolationStyle::Linear => 1,
            InterpolationStyle::Cubic => 2,
        }
    }
}

/// Gaps between the four keyframes taking part in a cubic blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenRanges {
    /// `from.position - prev.position`
    pub prev: f32,
    /// `to.position - from.position`
    pub current: f32,
    /// `next.position - to.position`
    pub next: f32,
}

impl TweenRanges {
    /// Cubic blend of one scalar parameter over these ranges.
    #[inline]
    pub fn tween(&self, prev: f32, from: f32, to: f32, next: f32, t: f32) -> f32 {
        cubic_tween(prev, from, to, next, self.prev, self.current, self.next, t)
    }
}

/// Parameter set carried by one keyframe.
///
/// `Clone` is the keyframe copy. Blends write into `self`, which is a scratch
/// value owned by the caller.
pub trait KeyframeData: Clone {
    /// Blend `from` towards `to` by `t` in `[0, 1]`.
    ///
    /// `t = 0` must reproduce `from` and `t = 1` must reproduce `to`.
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32);

    /// Four-point blend used by [`InterpolationStyle::Cubic`].
    ///
    /// Parameter sets with no meaningful cubic form keep the linear blend.
    fn smooth_interpolate(
        &mut self,
        prev: &Self,
        from: &Self,
        to: &Self,
        next: &Self,
        t: f32,
        ranges: TweenRanges,
    ) {
        let _ = (prev, next, ranges);
        self.interpolate(from, to, t);
    }
}

/// A parameter set pinned to a frame position.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<P> {
    position: i32,
    /// The parameters.
    pub data: P,
}

impl<P> Keyframe<P> {
    /// Frame position in `0..NUM_OSCILLATOR_WAVE_FRAMES`.
    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Position-sorted keyframes of one component.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<P> {
    keyframes: Vec<Keyframe<P>>,
    style: InterpolationStyle,
}

impl<P: KeyframeData> KeyframeTrack<P> {
    /// An empty track.
    pub fn new(style: InterpolationStyle) -> Self {
        Self {
            keyframes: Vec::new(),
            style,
        }
    }

    /// Interpolation style.
    pub fn style(&self) -> InterpolationStyle {
        self.style
    }

    /// Change the interpolation style.
    pub fn set_style(&mut self, style: InterpolationStyle) {
        self.style = style;
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// True when the track holds no keyframes.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// All keyframes in position order.
    pub fn keyframes(&self) -> &[Keyframe<P>] {
        &self.keyframes
    }

    /// Keyframe at `index`.
    pub fn get(&self, index: usize) -> Option<&Keyframe<P>> {
        self.keyframes.get(index)
    }

    /// Mutable parameters of the keyframe at `index`.
    ///
    /// Positions are changed only through [`reposition`](Self::reposition).
    pub fn data_mut(&mut self, index: usize) -> Option<&mut P> {
        self.keyframes.get_mut(index).map(|k| &mut k.data)
    }

    /// Mutable parameters of every keyframe.
    pub fn data_iter_mut(&mut self) -> impl Iterator<Item = &mut P> {
        self.keyframes.iter_mut().map(|k| &mut k.data)
    }

    /// Number of keyframes positioned strictly before `position`.
    ///
    /// This is also the index a new keyframe at `position` is inserted at.
    pub fn index_from_position(&self, position: f32) -> usize {
        self.keyframes
            .partition_point(|k| (k.position as f32) < position)
    }

    /// Insert `data` at `position`, keeping the track sorted.
    ///
    /// Returns the new keyframe's index.
    ///
    /// # Panics
    /// Panics if `position` is outside `0..NUM_OSCILLATOR_WAVE_FRAMES`.
    pub fn insert(&mut self, position: i32, data: P) -> usize {
        assert!(
            (0..NUM_OSCILLATOR_WAVE_FRAMES).contains(&position),
            "keyframe position {position} out of range"
        );
        let index = self.index_from_position(position as f32);
        self.keyframes.insert(index, Keyframe { position, data });
        index
    }

    /// Remove and return the keyframe at `index`.
    pub fn remove(&mut self, index: usize) -> Keyframe<P> {
        self.keyframes.remove(index)
    }

    /// Move the keyframe at `index` to `position`. Returns its new index.
    pub fn reposition(&mut self, index: usize, position: i32) -> usize {
        let keyframe = self.keyframes.remove(index);
        self.insert(position, keyframe.data)
    }

    /// Remove every keyframe.
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Position of the last keyframe, or 0 when empty.
    pub fn last_keyframe_position(&self) -> i32 {
        self.keyframes.last().map_or(0, |k| k.position)
    }

    /// Blend the keyframes around `position` into `dest`.
    ///
    /// Positions at or before the first keyframe, at or after the last, and
    /// any position under [`InterpolationStyle::None`] copy a single keyframe.
    /// An empty track leaves `dest` untouched.
    pub fn interpolate(&self, dest: &mut P, position: f32) {
        let count = self.keyframes.len();
        if count == 0 {
            return;
        }

        let index = self.index_from_position(position) as isize - 1;
        let clamped = index.clamp(0, count as isize - 1) as usize;
        if index < 0 || index >= count as isize - 1 || self.style == InterpolationStyle::None {
            dest.clone_from(&self.keyframes[clamped].data);
            return;
        }

        let from = &self.keyframes[clamped];
        let to = &self.keyframes[clamped + 1];
        let range = (to.position - from.position) as f32;
        let t = (position - from.position as f32) / range;

        if self.style == InterpolationStyle::Linear {
            dest.interpolate(&from.data, &to.data, t);
            return;
        }

        let prev = if clamped > 0 {
            &self.keyframes[clamped - 1]
        } else {
            to
        };
        let next = if clamped + 2 < count {
            &self.keyframes[clamped + 2]
        } else {
            from
        };
        let ranges = TweenRanges {
            prev: (from.position - prev.position) as f32,
            current: range,
            next: (next.position - to.position) as f32,
        };
        dest.smooth_interpolate(&prev.data, &from.data, &to.data, &next.data, t, ranges);
    }
}
