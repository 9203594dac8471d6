//! Pluggable sine-wave synthesis
//!
//! Every audible part of a SAME transmission is built from
//! sinusoids, and one sample of `sin(2π·f·t)` is requested for
//! every output sample. The [`SineGen`] carried by the
//! generator decides how that sample is computed. All engines
//! produce full-scale `i16` samples and treat `(t, f)`
//! identically, so they are interchangeable at the modulator
//! interface; they differ only in speed and accuracy.

use std::f32::consts::PI;
use std::fmt;

use lazy_static::lazy_static;
use strum::EnumMessage;

const TWO_PI: f32 = 2.0 * PI;

/// Number of entries in the sine lookup table
///
/// One full period. Must be a power of two so that index
/// wrap-around reduces to a mask.
pub const SINE_LUT_SIZE: usize = 1024;

lazy_static! {
    // One full period of full-scale i16 sine. Built once per
    // process on first use; read-only afterwards, so concurrent
    // generators may share it without coordination.
    static ref SINE_LUT: [i16; SINE_LUT_SIZE] = {
        let mut table = [0i16; SINE_LUT_SIZE];
        for (entry, k) in table.iter_mut().zip(0u32..) {
            let x = TWO_PI * k as f32 / SINE_LUT_SIZE as f32;
            *entry = (x.sin() * i16::MAX as f32) as i16;
        }
        table
    };
}

/// Force population of the sine lookup table
pub(crate) fn init_lut() {
    lazy_static::initialize(&SINE_LUT);
}

/// Application-supplied sine function
///
/// Receives the time `t` in seconds and the frequency `freq` in
/// Hz, and must return one full-scale signed 16-bit sample of
/// `sin(2π·freq·t)`. State, if the application needs any, lives
/// on the application's side.
pub type SineFn = fn(t: f32, freq: f32) -> i16;

/// Sine synthesis engine
///
/// Selected per [`SameGenerator`](crate::SameGenerator) at build
/// time via
/// [`SameGeneratorBuilder::with_sine_gen()`](crate::SameGeneratorBuilder::with_sine_gen).
/// The default is [`SineGen::Libc`].
///
/// ```
/// use samegen::SineGen;
///
/// let engine = SineGen::default();
/// assert_eq!("libc", engine.kind().as_str());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SineGen {
    /// The standard library's `sin()`, once per sample
    ///
    /// The most accurate engine, and plenty fast on anything
    /// with a hardware FPU.
    Libc,

    /// Precomputed lookup table with a phase accumulator
    ///
    /// Linear interpolation between adjacent table entries. The
    /// table is process-wide and populated on first use; call
    /// [`init()`](crate::init) to populate it eagerly instead.
    Lut,

    /// Low-order Taylor series approximation
    ///
    /// `x − x³/6 + x⁵/120 − x⁷/5040` after reduction into
    /// `[0, π)`. Useful where the multiplies pipeline better
    /// than a library call.
    Taylor,

    /// Application-provided function
    App(SineFn),
}

impl SineGen {
    /// One sample of `sin(2π·freq·t)`, scaled to full range
    ///
    /// `phase` is the caller's phase accumulator. Only the
    /// [`Lut`](SineGen::Lut) engine reads or advances it; the
    /// other engines derive the sample from `t` alone.
    #[inline]
    pub(crate) fn sample(&self, phase: &mut f32, t: f32, freq: f32, sample_rate: u32) -> i16 {
        match self {
            SineGen::Libc => libc_sin(t, freq),
            SineGen::Lut => lut_sin(phase, freq, sample_rate),
            SineGen::Taylor => taylor_sin(t, freq),
            SineGen::App(sin) => sin(t, freq),
        }
    }

    /// Which kind of engine this is
    pub fn kind(&self) -> SineGenKind {
        match self {
            SineGen::Libc => SineGenKind::Libc,
            SineGen::Lut => SineGenKind::Lut,
            SineGen::Taylor => SineGenKind::Taylor,
            SineGen::App(_) => SineGenKind::App,
        }
    }
}

impl Default for SineGen {
    fn default() -> Self {
        SineGen::Libc
    }
}

/// Sine engine descriptor
///
/// Identifies a [`SineGen`] variant without carrying its state.
/// Obtain via [`SineGen::kind()`]. Using it `.as_str()` yields a
/// short token; `Display` and
/// [`as_display_str()`](SineGenKind::as_display_str) yield a
/// human-readable description.
///
/// ```
/// use samegen::{SineGen, SineGenKind};
///
/// let kind = SineGen::Lut.kind();
/// assert_eq!(SineGenKind::Lut, kind);
/// assert_eq!("lut", kind.as_str());
/// assert_eq!(
///     "lookup table with phase accumulator and linear interpolation",
///     &format!("{}", kind)
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage)]
pub enum SineGenKind {
    /// Standard library `sin()`
    #[strum(serialize = "libc", detailed_message = "libc sin() call per sample")]
    Libc,

    /// Lookup table
    #[strum(
        serialize = "lut",
        detailed_message = "lookup table with phase accumulator and linear interpolation"
    )]
    Lut,

    /// Taylor series
    #[strum(
        serialize = "taylor",
        detailed_message = "low-order Taylor series approximation"
    )]
    Taylor,

    /// Application-provided function
    #[strum(serialize = "app", detailed_message = "application-provided sine function")]
    App,
}

impl SineGenKind {
    /// Short token for this engine, like "`lut`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Human-readable engine description
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl AsRef<str> for SineGenKind {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for SineGenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

fn libc_sin(t: f32, freq: f32) -> i16 {
    ((TWO_PI * freq * t).sin() * i16::MAX as f32).round() as i16
}

fn lut_sin(phase: &mut f32, freq: f32, sample_rate: u32) -> i16 {
    debug_assert!(*phase >= 0.0 && *phase < SINE_LUT_SIZE as f32);

    let index = *phase as usize;
    let frac = *phase - index as f32;
    let a = SINE_LUT[index] as f32;
    let b = SINE_LUT[(index + 1) & (SINE_LUT_SIZE - 1)] as f32;
    let sample = a + (b - a) * frac;

    // advance one sample and reduce modulo the table length;
    // subtracting instead of fmod() keeps the sub-entry phase
    *phase += freq * SINE_LUT_SIZE as f32 / sample_rate as f32;
    while *phase >= SINE_LUT_SIZE as f32 {
        *phase -= SINE_LUT_SIZE as f32;
    }

    sample as i16
}

fn taylor_sin(t: f32, freq: f32) -> i16 {
    let mut x = (TWO_PI * freq * t).abs() % TWO_PI;
    let mut sign = 1.0f32;
    if x >= PI {
        sign = -1.0;
        x -= PI;
    }

    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let sin = x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0;

    (sign * sin * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::waveform;

    const FS: u32 = 44100;

    // 2% of full scale
    const LUT_TOLERANCE: i32 = 655;

    // the four-term polynomial is worst near x = π, where its
    // residual is ≈0.0752
    const TAYLOR_TOLERANCE: i32 = 2630;

    #[test]
    fn test_lut_tracks_libc() {
        for freq in [
            waveform::FSK_SPACE_HZ,
            waveform::FSK_MARK_HZ,
            waveform::ATTN_TONE_A_HZ,
            waveform::ATTN_TONE_B_HZ,
        ] {
            let mut phase = 0.0f32;
            for n in 0..FS / 10 {
                let t = n as f32 / FS as f32;
                let lut = SineGen::Lut.sample(&mut phase, t, freq, FS);
                let libc = SineGen::Libc.sample(&mut 0.0, t, freq, FS);
                assert!(
                    (lut as i32 - libc as i32).abs() <= LUT_TOLERANCE,
                    "lut {} vs libc {} at n={} f={}",
                    lut,
                    libc,
                    n,
                    freq
                );
            }
        }
    }

    #[test]
    fn test_taylor_tracks_libc() {
        for freq in [waveform::FSK_SPACE_HZ, waveform::FSK_MARK_HZ] {
            for n in 0..FS / 10 {
                let t = n as f32 / FS as f32;
                let taylor = SineGen::Taylor.sample(&mut 0.0, t, freq, FS);
                let libc = SineGen::Libc.sample(&mut 0.0, t, freq, FS);
                assert!(
                    (taylor as i32 - libc as i32).abs() <= TAYLOR_TOLERANCE,
                    "taylor {} vs libc {} at n={} f={}",
                    taylor,
                    libc,
                    n,
                    freq
                );
            }
        }
    }

    #[test]
    fn test_taylor_polynomial_accuracy() {
        use assert_approx_eq::assert_approx_eq;

        // sweep the reduced domain, stopping short of the π
        // endpoint where the residual term peaks
        for k in 0..=100 {
            let x = 2.5f32 * k as f32 / 100.0;
            let approx = taylor_sin(x / TWO_PI, 1.0) as f32 / i16::MAX as f32;
            assert_approx_eq!(x.sin(), approx, 0.02f32);
        }
    }

    #[test]
    fn test_libc_full_scale() {
        // quarter period of a 1 Hz tone
        assert_eq!(i16::MAX, libc_sin(0.25, 1.0));
        assert_eq!(0, libc_sin(0.0, 1.0));
        assert_eq!(-i16::MAX, libc_sin(0.75, 1.0));
    }

    #[test]
    fn test_lut_phase_wraps() {
        let mut phase = 0.0f32;
        for n in 0..8 * FS {
            let t = n as f32 / FS as f32;
            SineGen::Lut.sample(&mut phase, t, waveform::FSK_MARK_HZ, FS);
            assert!(phase >= 0.0 && phase < SINE_LUT_SIZE as f32);
        }
    }

    #[test]
    fn test_app_engine_is_called() {
        fn always_one(_t: f32, _freq: f32) -> i16 {
            1
        }

        let engine = SineGen::App(always_one);
        assert_eq!(1, engine.sample(&mut 0.0, 0.5, 440.0, FS));
        assert_eq!(SineGenKind::App, engine.kind());
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!("libc", SineGen::Libc.kind().as_str());
        assert_eq!("lut", SineGen::Lut.kind().as_str());
        assert_eq!("taylor", SineGen::Taylor.kind().as_str());
        assert_eq!(
            "low-order Taylor series approximation",
            SineGen::Taylor.kind().as_display_str()
        );
    }
}
