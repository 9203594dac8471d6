//! On-air byte layout of SAME bursts
//!
//! A SAME transmission carries two kinds of data burst: the
//! header frame, rendered from a [`Header`] by
//! [`frame_header()`], and the fixed End-Of-Message frame
//! [`EOM_FRAME`]. Both open with sixteen preamble bytes; the
//! remainder is printable ASCII. An example header frame, after
//! the preamble:
//!
//! ```txt
//! ZCZC-WXR-RWT-012345-567890-888990+0015-0321115-KLOX/NWS-
//! ```
//!
//! Note the `+` in place of a `-` ahead of the valid time
//! period: that single byte separates the location list from
//! the time fields.

use std::fmt;
use std::iter;

use arrayvec::ArrayVec;

#[cfg(not(test))]
use log::debug;
#[cfg(test)]
use std::println as debug;

use crate::header::{
    Header, CALLSIGN_LEN, EVENT_CODE_LEN, LOCATION_CODES_MAX, LOCATION_CODE_LEN,
    ORIGINATOR_CODE_LEN, ORIGINATOR_TIME_LEN, VALID_TIME_PERIOD_LEN,
};
use crate::waveform::{PREAMBLE, PREAMBLE_COUNT};

/// Marks the start of a header frame
const ASCII_START: &[u8; 4] = b"ZCZC";

/// Marks the End Of Message
const ASCII_EOM: &[u8; 4] = b"NNNN";

/// Length of the End-Of-Message frame, in bytes
pub const EOM_FRAME_LEN: usize = PREAMBLE_COUNT + ASCII_EOM.len();

/// The End-Of-Message frame
///
/// Sixteen preamble bytes followed by "`NNNN`". Transmitted
/// three times at the end of every SAME message.
pub const EOM_FRAME: [u8; EOM_FRAME_LEN] = [
    PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE,
    PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, PREAMBLE, b'N', b'N', b'N', b'N',
];

/// Largest possible serialized header frame, in bytes
///
/// A frame with `k` location codes is `51 + 7·k` bytes long;
/// with all 31 locations populated that comes to 268.
pub const MAX_FRAME_LEN: usize = PREAMBLE_COUNT
    + ASCII_START.len()
    + 1
    + (ORIGINATOR_CODE_LEN + 1)
    + (EVENT_CODE_LEN + 1)
    + LOCATION_CODES_MAX * (LOCATION_CODE_LEN + 1)
    + (VALID_TIME_PERIOD_LEN + 1)
    + (ORIGINATOR_TIME_LEN + 1)
    + (CALLSIGN_LEN + 1);

/// A serialized burst, ready for AFSK modulation
pub type Frame = ArrayVec<u8, MAX_FRAME_LEN>;

/// Render a header to its on-air byte sequence
///
/// Produces the preamble followed by the ASCII frame: the start
/// marker, originator and event codes, the location list with
/// its terminating `+`, the two time fields, and the callsign,
/// each field followed by a dash. The output is a pure function
/// of the `header`.
///
/// ```
/// use samegen::{frame_header, HeaderBuilder, PREAMBLE};
///
/// let header = HeaderBuilder::new("WXR", "TOR")
///     .with_location("048484")
///     .with_location("048024")
///     .with_valid_time_period("1000")
///     .with_originator_time("1172221")
///     .with_callsign("WAEB/AM ")
///     .build()
///     .unwrap();
///
/// let frame = frame_header(&header);
/// assert_eq!(65, frame.len());
/// assert_eq!(PREAMBLE, frame[0]);
/// assert_eq!(
///     b"ZCZC-WXR-TOR-048484-048024+1000-1172221-WAEB/AM -",
///     &frame[16..]
/// );
/// ```
pub fn frame_header(header: &Header) -> Frame {
    let mut frame = Frame::new();

    frame.extend(iter::repeat(PREAMBLE).take(PREAMBLE_COUNT));
    frame.extend(*ASCII_START);
    frame.push(b'-');

    push_field(&mut frame, header.originator());
    push_field(&mut frame, header.event_code());
    for location in header.locations() {
        push_field(&mut frame, location);
    }

    // the final location is delimited by `+`, not `-`
    let last = frame.len() - 1;
    frame[last] = b'+';

    push_field(&mut frame, header.valid_time_period());
    push_field(&mut frame, header.originator_time());
    push_field(&mut frame, header.callsign());

    debug!(
        "framed header: {} bytes, {} location(s)",
        frame.len(),
        header.location_count()
    );

    frame
}

// Appends one dash-terminated field. Capacity is guaranteed by
// MAX_FRAME_LEN, which sums the same field-length constants the
// Header was validated against.
fn push_field(frame: &mut Frame, field: &str) {
    frame.extend(field.bytes());
    frame.push(b'-');
}

impl fmt::Display for Header {
    /// The ASCII frame, without the preamble
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = frame_header(self);
        let ascii = std::str::from_utf8(&frame[PREAMBLE_COUNT..]).map_err(|_| fmt::Error)?;
        f.write_str(ascii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::header::HeaderBuilder;

    fn canonical_header() -> Header {
        HeaderBuilder::new("WXR", "TOR")
            .with_location("048484")
            .with_location("048024")
            .with_valid_time_period("1000")
            .with_originator_time("1172221")
            .with_callsign("WAEB/AM ")
            .build()
            .expect("valid header")
    }

    #[test]
    fn test_canonical_framing() {
        let frame = frame_header(&canonical_header());

        assert_eq!(65, frame.len());
        for &byte in &frame[0..PREAMBLE_COUNT] {
            assert_eq!(PREAMBLE, byte);
        }
        assert_eq!(b"ZCZC", &frame[16..20]);
        assert_eq!(
            b"WXR-TOR-048484-048024+1000-1172221-WAEB/AM -".as_slice(),
            &frame[21..]
        );
    }

    #[test]
    fn test_plus_precedes_valid_time() {
        let frame = frame_header(&canonical_header());
        let plus = frame.iter().position(|&b| b == b'+').expect("have plus");

        assert_eq!(b"1000", &frame[plus + 1..plus + 5]);
        assert_eq!(1, frame.iter().filter(|&&b| b == b'+').count());
    }

    #[test]
    fn test_frame_ends_with_dash() {
        let frame = frame_header(&canonical_header());
        assert_eq!(b'-', frame[frame.len() - 1]);
    }

    #[test]
    fn test_length_scales_with_locations() {
        for count in 1..=LOCATION_CODES_MAX {
            let mut bld = HeaderBuilder::new("WXR", "TOR");
            bld.with_valid_time_period("1000")
                .with_originator_time("1172221")
                .with_callsign("WAEB/AM ");
            for _ in 0..count {
                bld.with_location("048484");
            }
            let frame = frame_header(&bld.build().unwrap());
            assert_eq!(51 + 7 * count, frame.len());
        }
    }

    #[test]
    fn test_maximum_locations_fill_frame() {
        let mut bld = HeaderBuilder::new("WXR", "TOR");
        bld.with_valid_time_period("1000")
            .with_originator_time("1172221")
            .with_callsign("WAEB/AM ");
        for _ in 0..LOCATION_CODES_MAX {
            bld.with_location("048484");
        }
        let frame = frame_header(&bld.build().unwrap());

        assert_eq!(MAX_FRAME_LEN, frame.len());
        assert_eq!(268, frame.len());
        assert!(frame.is_full());
    }

    #[test]
    fn test_single_location() {
        let frame = frame_header(
            HeaderBuilder::new("CIV", "EVI")
                .with_location("000000")
                .with_valid_time_period("0100")
                .with_originator_time("0011200")
                .with_callsign("TEST    ")
                .build()
                .as_ref()
                .unwrap(),
        );

        assert_eq!(58, frame.len());
        assert_eq!(
            b"CIV-EVI-000000+0100-0011200-TEST    -".as_slice(),
            &frame[21..]
        );
    }

    #[test]
    fn test_display_omits_preamble() {
        assert_eq!(
            "ZCZC-WXR-TOR-048484-048024+1000-1172221-WAEB/AM -",
            &format!("{}", canonical_header())
        );
    }

    #[test]
    fn test_eom_frame() {
        assert_eq!(20, EOM_FRAME.len());
        for &byte in &EOM_FRAME[0..PREAMBLE_COUNT] {
            assert_eq!(PREAMBLE, byte);
        }
        assert_eq!(b"NNNN", &EOM_FRAME[PREAMBLE_COUNT..]);
    }

    #[test]
    fn test_framing_is_idempotent() {
        let header = canonical_header();
        assert_eq!(frame_header(&header), frame_header(&header));
    }
}
