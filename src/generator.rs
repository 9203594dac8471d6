//! Sample generation sequencer
//!
//! A complete SAME transmission is an ordered sequence of
//! fourteen phases: the header frame is sent three times, each
//! burst followed by one second of silence; then the two-tone
//! attention signal and another second of silence; then the
//! End-Of-Message frame three times, again with a second of
//! silence after each. The [`SameGenerator`] owns that
//! progression and renders it incrementally, one
//! [`CHUNK_SAMPLES`]-sample chunk per call.
//!
//! Rendering a whole transmission at once is deliberately not
//! offered. At 44100 Hz a maximum-length message runs to nearly
//! two million samples (around 4 MB of PCM), which is an
//! unreasonable resident buffer for the small targets this
//! library is meant to serve. Chunked generation keeps the
//! working set to the context itself.

#[cfg(not(test))]
use log::{debug, info};

#[cfg(test)]
use std::{println as debug, println as info};

use crate::afsk::AfskState;
use crate::attention::AttentionSignal;
use crate::framing::{frame_header, Frame, EOM_FRAME, EOM_FRAME_LEN};
use crate::header::Header;
use crate::sine::SineGen;
use crate::waveform::{self, BITS_PER_BYTE, SILENCE_SECS};

/// Audio samples produced per [`SameGenerator::next_chunk()`] call
pub const CHUNK_SAMPLES: usize = 4096;

/// Number of active sequencer phases
const SEQ_PHASE_COUNT: usize = 14;

/// Sequencer phase
///
/// Phases are laid out in the order a listener hears them.
/// [`Done`](SeqState::Done) is terminal: a generator that has
/// reached it produces no further samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeqState {
    /// First transmission of the header frame
    AfskHeaderFirst = 0,
    /// Silence after the first header burst
    SilenceFirst = 1,
    /// Second transmission of the header frame
    AfskHeaderSecond = 2,
    /// Silence after the second header burst
    SilenceSecond = 3,
    /// Third transmission of the header frame
    AfskHeaderThird = 4,
    /// Silence after the third header burst
    SilenceThird = 5,
    /// Two-tone attention signal, 8 to 25 seconds
    AttentionSignal = 6,
    /// Silence after the attention signal
    SilenceFourth = 7,
    /// First transmission of the End-Of-Message frame
    AfskEomFirst = 8,
    /// Silence after the first EOM burst
    SilenceFifth = 9,
    /// Second transmission of the End-Of-Message frame
    AfskEomSecond = 10,
    /// Silence after the second EOM burst
    SilenceSixth = 11,
    /// Third transmission of the End-Of-Message frame
    AfskEomThird = 12,
    /// Silence after the third EOM burst
    SilenceSeventh = 13,
    /// Transmission complete
    Done = 14,
}

impl SeqState {
    // index into the per-phase sample budgets
    fn index(&self) -> usize {
        *self as usize
    }

    fn next(&self) -> SeqState {
        use SeqState::*;

        match self {
            AfskHeaderFirst => SilenceFirst,
            SilenceFirst => AfskHeaderSecond,
            AfskHeaderSecond => SilenceSecond,
            SilenceSecond => AfskHeaderThird,
            AfskHeaderThird => SilenceThird,
            SilenceThird => AttentionSignal,
            AttentionSignal => SilenceFourth,
            SilenceFourth => AfskEomFirst,
            AfskEomFirst => SilenceFifth,
            SilenceFifth => AfskEomSecond,
            AfskEomSecond => SilenceSixth,
            SilenceSixth => AfskEomThird,
            AfskEomThird => SilenceSeventh,
            SilenceSeventh => Done,
            Done => Done,
        }
    }
}

/// Builds a [`SameGenerator`]
///
/// The only mandatory parameter is the output sampling rate, in
/// Hz; 44100 is the tested default and the value
/// [`default()`](SameGeneratorBuilder::default) uses. The sine
/// engine may be changed from its [`SineGen::Libc`] default
/// before building.
///
/// ```
/// use samegen::{HeaderBuilder, SameGeneratorBuilder, SineGen};
///
/// let header = HeaderBuilder::new("WXR", "RWT")
///     .with_location("012345")
///     .with_valid_time_period("0015")
///     .with_originator_time("0321115")
///     .with_callsign("KLOX/NWS")
///     .build()
///     .unwrap();
///
/// let generator = SameGeneratorBuilder::new(44100)
///     .with_sine_gen(SineGen::Lut)
///     .build(&header);
/// assert_eq!(44100, generator.sample_rate());
/// assert_eq!(85, generator.samples_per_bit());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SameGeneratorBuilder {
    sample_rate: u32,
    sine: SineGen,
}

impl SameGeneratorBuilder {
    /// New generator builder with the given sampling rate (Hz)
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            sine: SineGen::default(),
        }
    }

    /// Select the sine synthesis engine
    pub fn with_sine_gen(&mut self, sine: SineGen) -> &mut Self {
        self.sine = sine;
        self
    }

    /// Build a generator for one transmission of `header`
    ///
    /// Serializes the header and computes every phase's sample
    /// budget. The generator starts positioned at the first
    /// sample of the first header burst.
    ///
    /// # Panics
    ///
    /// Panics if the sampling rate is too low to represent even
    /// one sample per transmitted bit (anything below the
    /// 520.83 Hz baud rate).
    pub fn build(&self, header: &Header) -> SameGenerator {
        let samples_per_bit = waveform::samples_per_bit(self.sample_rate);
        assert!(
            samples_per_bit > 0,
            "sampling rate {} Hz cannot carry a {} Hz bit rate",
            self.sample_rate,
            waveform::BAUD_HZ
        );

        let frame = frame_header(header);

        let header_burst = BITS_PER_BYTE * samples_per_bit * frame.len() as u32;
        let eom_burst = BITS_PER_BYTE * samples_per_bit * EOM_FRAME_LEN as u32;
        let silence = SILENCE_SECS * self.sample_rate;
        let attention = header.attention_duration() * self.sample_rate;

        let mut seq_samples_remaining = [0u32; SEQ_PHASE_COUNT];
        for state in [
            SeqState::AfskHeaderFirst,
            SeqState::AfskHeaderSecond,
            SeqState::AfskHeaderThird,
        ] {
            seq_samples_remaining[state.index()] = header_burst;
        }
        for state in [
            SeqState::AfskEomFirst,
            SeqState::AfskEomSecond,
            SeqState::AfskEomThird,
        ] {
            seq_samples_remaining[state.index()] = eom_burst;
        }
        for state in [
            SeqState::SilenceFirst,
            SeqState::SilenceSecond,
            SeqState::SilenceThird,
            SeqState::SilenceFourth,
            SeqState::SilenceFifth,
            SeqState::SilenceSixth,
            SeqState::SilenceSeventh,
        ] {
            seq_samples_remaining[state.index()] = silence;
        }
        seq_samples_remaining[SeqState::AttentionSignal.index()] = attention;

        info!(
            "generator: {} Hz, {} samples/bit, {} byte frame, {} engine",
            self.sample_rate,
            samples_per_bit,
            frame.len(),
            self.sine.kind().as_str()
        );

        SameGenerator {
            sample_data: [0i16; CHUNK_SAMPLES],
            frame,
            seq_samples_remaining,
            state: SeqState::AfskHeaderFirst,
            afsk: AfskState::default(),
            attn: AttentionSignal::default(),
            sine: self.sine,
            sample_rate: self.sample_rate,
            samples_per_bit,
        }
    }
}

impl Default for SameGeneratorBuilder {
    fn default() -> Self {
        Self::new(44100)
    }
}

/// Incremental SAME transmission audio generator
///
/// A `SameGenerator` renders one complete transmission of one
/// [`Header`] as signed 16-bit mono PCM, in chunks of
/// [`CHUNK_SAMPLES`] samples. All state lives inline in the
/// struct, from the output buffer down to the oscillator
/// positions; generation performs no heap allocation and
/// cannot fail.
///
/// ```
/// use samegen::{HeaderBuilder, SameGeneratorBuilder};
///
/// let header = HeaderBuilder::new("WXR", "RWT")
///     .with_location("012345")
///     .with_valid_time_period("0015")
///     .with_originator_time("0321115")
///     .with_callsign("KLOX/NWS")
///     .build()
///     .unwrap();
///
/// let mut generator = SameGeneratorBuilder::default().build(&header);
/// let mut total = 0usize;
/// while let Some(chunk) = generator.next_chunk() {
///     // hand `chunk` to your audio sink here
///     total += chunk.len();
/// }
/// assert!(generator.is_done());
/// assert_eq!(0, generator.samples_remaining());
/// # assert!(total > 0);
/// ```
///
/// The generator is a single-owner object: distinct generators
/// are fully independent, but one generator must not be shared
/// between threads without external synchronization.
#[derive(Clone, Debug)]
pub struct SameGenerator {
    // chunk output buffer
    sample_data: [i16; CHUNK_SAMPLES],

    // serialized header frame, sent during the header bursts
    frame: Frame,

    // per-phase sample budgets, indexed by SeqState
    seq_samples_remaining: [u32; SEQ_PHASE_COUNT],

    // current sequencer phase
    state: SeqState,

    afsk: AfskState,
    attn: AttentionSignal,
    sine: SineGen,

    sample_rate: u32,
    samples_per_bit: u32,
}

impl SameGenerator {
    /// Generate the next chunk of samples
    ///
    /// Fills the internal buffer with the next
    /// [`CHUNK_SAMPLES`] samples of the transmission and
    /// returns them. The returned slice is shorter than a full
    /// chunk only on the final call, and consecutive calls
    /// return consecutive, non-overlapping windows of the audio
    /// stream. Returns `None`, harmlessly and forever, once the
    /// transmission is complete.
    pub fn next_chunk(&mut self) -> Option<&[i16]> {
        if self.state == SeqState::Done {
            return None;
        }

        let mut filled = 0usize;
        while filled < CHUNK_SAMPLES {
            let sample = match self.state {
                SeqState::AfskHeaderFirst
                | SeqState::AfskHeaderSecond
                | SeqState::AfskHeaderThird => {
                    self.afsk
                        .sample(&self.frame, &self.sine, self.sample_rate, self.samples_per_bit)
                }

                SeqState::SilenceFirst
                | SeqState::SilenceSecond
                | SeqState::SilenceThird
                | SeqState::SilenceFourth
                | SeqState::SilenceFifth
                | SeqState::SilenceSixth
                | SeqState::SilenceSeventh => 0i16,

                SeqState::AttentionSignal => self.attn.sample(&self.sine, self.sample_rate),

                SeqState::AfskEomFirst | SeqState::AfskEomSecond | SeqState::AfskEomThird => {
                    self.afsk
                        .sample(&EOM_FRAME, &self.sine, self.sample_rate, self.samples_per_bit)
                }

                SeqState::Done => unreachable!("sampled a terminal generator"),
            };

            self.sample_data[filled] = sample;
            filled += 1;

            let remaining = &mut self.seq_samples_remaining[self.state.index()];
            *remaining -= 1;
            if *remaining == 0 {
                self.state = self.state.next();
                debug!("sequencer: entering {:?}", self.state);

                if self.state == SeqState::Done {
                    break;
                }
            }
        }

        Some(&self.sample_data[..filled])
    }

    /// Output sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples generated per transmitted bit
    pub fn samples_per_bit(&self) -> u32 {
        self.samples_per_bit
    }

    /// The sine synthesis engine in use
    pub fn sine_gen(&self) -> &SineGen {
        &self.sine
    }

    /// Current sequencer phase
    pub fn state(&self) -> SeqState {
        self.state
    }

    /// Whether the transmission has been fully generated
    pub fn is_done(&self) -> bool {
        self.state == SeqState::Done
    }

    /// Total samples not yet generated, across all phases
    pub fn samples_remaining(&self) -> u64 {
        self.seq_samples_remaining
            .iter()
            .map(|&n| n as u64)
            .sum()
    }

    /// The serialized header frame sent during header bursts
    pub fn frame_data(&self) -> &[u8] {
        &self.frame
    }
}
