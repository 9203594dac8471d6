//! # samegen: SAME/EAS Header Generation
//!
//! This crate generates the audio of
//! [Specific Area Message Encoding](https://en.wikipedia.org/wiki/Specific_Area_Message_Encoding)
//! (SAME) message headers: the digital data bursts, two-tone
//! attention signal, and End-Of-Message trailer that bracket
//! United States Emergency Alert System (EAS) broadcasts, as
//! specified in 47 CFR §11.31. The output is mono signed 16-bit
//! PCM, produced incrementally in fixed-size chunks with no
//! heap allocation.
//!
//! ## Disclaimer
//!
//! This crate is dual-licensed MIT and Apache 2.0. Read these
//! licenses carefully as they may affect your rights.
//!
//! This crate has not been certified as an EAS encoder. The
//! author **strongly discourages** its use in any safety-critical
//! application. In the United States, transmitting the EAS
//! attention signal or SAME data bursts outside of an authorized
//! alert or test is a federal offense. Keep generated audio away
//! from anything that broadcasts.
//!
//! ## Example
//!
//! Describe the message with a [`HeaderBuilder`], then drain
//! chunks from a [`SameGenerator`] into your audio sink:
//!
//! ```
//! use samegen::{HeaderBuilder, SameGeneratorBuilder, SineGen};
//!
//! let header = HeaderBuilder::new("WXR", "RWT")
//!     .with_location("012345")
//!     .with_location("567890")
//!     .with_valid_time_period("0015")
//!     .with_originator_time("0321115")
//!     .with_callsign("KLOX/NWS")
//!     .with_attn_duration(8)
//!     .build()
//!     .expect("header fields are valid");
//!
//! // this header frames as:
//! assert_eq!(
//!     "ZCZC-WXR-RWT-012345-567890+0015-0321115-KLOX/NWS-",
//!     &format!("{}", header)
//! );
//!
//! let mut generator = SameGeneratorBuilder::new(44100)
//!     .with_sine_gen(SineGen::Lut)
//!     .build(&header);
//!
//! while let Some(chunk) = generator.next_chunk() {
//!     // hand `chunk` (up to 4096 i16 samples) to a sound
//!     // device, file writer, etc.
//!     let _ = chunk;
//! }
//! assert!(generator.is_done());
//! ```
//!
//! Playback is beyond the scope of this crate. To reach a
//! soundcard, try [cpal](https://crates.io/crates/cpal); to
//! write a file, any WAV writer that accepts interleaved
//! `i16` samples will do. When serializing to storage, samples
//! are conventionally little-endian.
//!
//! ## Background
//!
//! A SAME message is mostly *audio*: a synthesized voice
//! describing an emergency and what to do about it. The digital
//! header generated here is transmitted three times ahead of
//! that audio, modulated with two-level audio frequency-shift
//! keying (AFSK) at 520.83 baud so it survives analog broadcast
//! chains. An example header, as heard "off the wire" in ASCII:
//!
//! ```txt
//! ZCZC-WXR-RWT-012345-567890-888990+0015-0321115-KLOX/NWS-
//! ```
//!
//! Between the header bursts and the voice message comes the
//! attention signal, a two-tone chord (853 Hz + 960 Hz) lasting
//! 8 to 25 seconds. Three short "`NNNN`" bursts end the
//! message. This crate renders that entire sequence, from the
//! first header burst through the trailing silence, as one
//! continuous sample stream.
//!
//! ## Sine engines
//!
//! Sample synthesis bottoms out in a sine function, selectable
//! per generator via [`SineGen`]: the standard library's `sin`,
//! an interpolating lookup table, a short Taylor series, or an
//! application-provided function. All engines are
//! interchangeable; see [`SineGenKind`] for descriptions. The
//! lookup table is process-wide and built on first use; call
//! [`init()`] at startup to build it eagerly instead.
//!
//! ## Crate features
//!
//! * `chrono`: adds
//!   [`HeaderBuilder::with_issue_time()`](HeaderBuilder::with_issue_time),
//!   which derives the JJJHHMM originator time from a
//!   timestamp. If enabled, `chrono` becomes part of this
//!   crate's public API.

mod afsk;
mod attention;
mod framing;
mod generator;
mod header;
mod sine;
mod waveform;

pub use framing::{frame_header, Frame, EOM_FRAME, EOM_FRAME_LEN, MAX_FRAME_LEN};
pub use generator::{SameGenerator, SameGeneratorBuilder, SeqState, CHUNK_SAMPLES};
pub use header::{
    Header, HeaderBuilder, HeaderErr, CALLSIGN_LEN, EVENT_CODE_LEN, LOCATION_CODES_MAX,
    LOCATION_CODE_LEN, ORIGINATOR_CODE_LEN, ORIGINATOR_TIME_LEN, VALID_TIME_PERIOD_LEN,
};
pub use sine::{SineFn, SineGen, SineGenKind, SINE_LUT_SIZE};
pub use waveform::{
    attention_duration_bounds, samples_per_bit, ATTN_DURATION_MAX_SECS, ATTN_DURATION_MIN_SECS,
    ATTN_TONE_A_HZ, ATTN_TONE_B_HZ, BAUD_HZ, FSK_MARK_HZ, FSK_SPACE_HZ, PREAMBLE, PREAMBLE_COUNT,
    SILENCE_SECS,
};

/// One-time process-wide setup
///
/// Populates the shared sine lookup table used by
/// [`SineGen::Lut`]. Calling this is optional, since the table
/// is lazily built the first time a `Lut` generator needs it,
/// but an eager call keeps that one-time cost out of the sample
/// path. Idempotent and thread-safe.
pub fn init() {
    sine::init_lut();
}
