//! Transpose quantisation to a set of allowed pitch classes.

/// Semitones per octave.
pub const NOTES_PER_OCTAVE: usize = 12;

/// Snaps transpose values onto the pitch classes in a 12-bit mask.
///
/// Bit `n` of the mask allows pitch class `n` (0 = C). The snapping table is
/// rebuilt only when the mask changes. In global mode the sounding pitch
/// (note plus transpose) is snapped; in local mode only the transpose is,
/// relative to the played note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransposeQuantizer {
    mask: u16,
    global: bool,
    offsets: [i8; NOTES_PER_OCTAVE],
}

impl TransposeQuantizer {
    /// A quantizer that lets everything through.
    pub fn new() -> Self {
        Self {
            mask: 0,
            global: false,
            offsets: [0; NOTES_PER_OCTAVE],
        }
    }

    /// Select the allowed pitch classes. Returns true when the table changed.
    pub fn set_mask(&mut self, mask: u16) -> bool {
        let mask = mask & 0x0fff;
        if mask == self.mask {
            return false;
        }
        self.mask = mask;
        self.offsets = build_offsets(mask);
        true
    }

    /// Snap the sounding pitch instead of the transpose alone.
    pub fn set_global(&mut self, global: bool) {
        self.global = global;
    }

    /// Current mask.
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// True when at least one pitch class is selected.
    pub fn is_active(&self) -> bool {
        self.mask != 0
    }

    /// Quantised transpose for `transpose` semitones on `note`.
    #[inline]
    pub fn quantize(&self, transpose: f32, note: f32) -> f32 {
        if !self.is_active() {
            return transpose;
        }
        if self.global {
            self.snap(note + transpose) - note
        } else {
            self.snap(transpose)
        }
    }

    #[inline]
    fn snap(&self, value: f32) -> f32 {
        let rounded = value.round();
        let class = (rounded as i32).rem_euclid(NOTES_PER_OCTAVE as i32) as usize;
        rounded + f32::from(self.offsets[class])
    }
}

impl Default for TransposeQuantizer {
    fn default() -> Self {
        Self::new()
    }
}

// Offset from each pitch class to the nearest allowed one. Ties go down.
fn build_offsets(mask: u16) -> [i8; NOTES_PER_OCTAVE] {
    let mut offsets = [0; NOTES_PER_OCTAVE];
    if mask == 0 {
        return offsets;
    }
    let allowed = |class: i32| mask & (1 << class.rem_euclid(NOTES_PER_OCTAVE as i32)) != 0;
    for (class, offset) in offsets.iter_mut().enumerate() {
        let class = class as i32;
        for distance in 0..=(NOTES_PER_OCTAVE as i32 / 2) {
            if allowed(class - distance) {
                *offset = -distance as i8;
                break;
            }
            if allowed(class + distance) {
                *offset = distance as i8;
                break;
            }
        }
    }
    offsets
}
