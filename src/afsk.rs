//! AFSK modulation of data bursts
//!
//! Bits are sent least-significant first, one tone per bit:
//! 2083.3 Hz for a one (mark) and 1562.5 Hz for a zero (space).

use crate::sine::SineGen;
use crate::waveform::{BITS_PER_BYTE, FSK_MARK_HZ, FSK_SPACE_HZ};

/// AFSK modulator state
///
/// Tracks the position within a data burst: which byte, which
/// bit of that byte, and which sample of that bit. One sample
/// is produced per [`sample()`](AfskState::sample) call; the
/// sequencer decides how many calls a burst receives. When the
/// final byte of the burst completes, the state clears itself,
/// ready for the next burst over the same or different data.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AfskState {
    // byte index into the burst data
    data_pos: usize,

    // bit within the current byte, LSB first (0..8)
    bit_pos: u32,

    // sample within the current bit (0..samples_per_bit)
    sample_num: u32,

    // sine phase accumulator (LUT engine only)
    phase: f32,
}

impl AfskState {
    /// Reset to zero initial conditions
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Synthesize the next sample of a burst over `data`
    #[inline]
    pub(crate) fn sample(
        &mut self,
        data: &[u8],
        sine: &SineGen,
        sample_rate: u32,
        samples_per_bit: u32,
    ) -> i16 {
        debug_assert!(self.data_pos < data.len());

        let bit = data[self.data_pos] >> self.bit_pos & 1;
        let freq = if bit == 1 { FSK_MARK_HZ } else { FSK_SPACE_HZ };

        let t = self.sample_num as f32 / sample_rate as f32;
        let sample = sine.sample(&mut self.phase, t, freq, sample_rate);

        self.sample_num += 1;
        if self.sample_num >= samples_per_bit {
            self.sample_num = 0;
            self.bit_pos += 1;

            if self.bit_pos >= BITS_PER_BYTE {
                self.bit_pos = 0;
                self.data_pos += 1;

                if self.data_pos >= data.len() {
                    self.reset();
                }
            }
        }

        sample
    }
}
