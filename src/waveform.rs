//! Waveform parameters for SAME transmission

/// Mark frequency (Hz)
///
/// Transmitted for a one bit.
pub const FSK_MARK_HZ: f32 = 2083.3;

/// Space frequency (Hz)
///
/// Transmitted for a zero bit.
pub const FSK_SPACE_HZ: f32 = 1562.5;

/// Baud rate (Hz)
pub const BAUD_HZ: f32 = 520.83;

/// Preamble byte
///
/// The preamble byte is repeated sixteen times before every
/// SAME burst. It contains many bit transitions to ensure
/// that receivers acquire bit and byte synchronization
/// quickly.
pub const PREAMBLE: u8 = 0xab;

/// Number of times the preamble byte is sent before each burst
pub const PREAMBLE_COUNT: usize = 16;

/// Bits transmitted per byte
pub(crate) const BITS_PER_BYTE: u32 = 8;

/// First fundamental frequency of the attention signal (Hz)
pub const ATTN_TONE_A_HZ: f32 = 853.0;

/// Second fundamental frequency of the attention signal (Hz)
pub const ATTN_TONE_B_HZ: f32 = 960.0;

/// Minimum attention signal duration (seconds)
pub const ATTN_DURATION_MIN_SECS: u32 = 8;

/// Maximum attention signal duration (seconds)
pub const ATTN_DURATION_MAX_SECS: u32 = 25;

/// Duration of the silence period between bursts (seconds)
pub const SILENCE_SECS: u32 = 1;

/// Permitted attention signal durations, in seconds
///
/// Returns `(min, max)`, inclusive on both ends. Durations
/// outside this range are rejected during
/// [`Header`](crate::Header) construction.
///
/// ```
/// assert_eq!((8, 25), samegen::attention_duration_bounds());
/// ```
pub fn attention_duration_bounds() -> (u32, u32) {
    (ATTN_DURATION_MIN_SECS, ATTN_DURATION_MAX_SECS)
}

/// Samples per transmitted bit at the given sampling rate
///
/// Rounds to the nearest whole sample. At 44100 Hz the exact
/// value is ≈84.67 samples per bit; truncating it would shorten
/// every burst by a decodable margin, so the result rounds half
/// up instead.
pub fn samples_per_bit(sample_rate: u32) -> u32 {
    (sample_rate as f32 / BAUD_HZ + 0.5) as u32
}
