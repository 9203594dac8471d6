//! Header descriptors for transmission

use arrayvec::{ArrayString, ArrayVec};
use thiserror::Error;

use crate::waveform::{ATTN_DURATION_MAX_SECS, ATTN_DURATION_MIN_SECS};

/// Length of the originator code (ORG) field
pub const ORIGINATOR_CODE_LEN: usize = 3;

/// Length of the event code (EEE) field
pub const EVENT_CODE_LEN: usize = 3;

/// Length of a location code (PSSCCC) field
pub const LOCATION_CODE_LEN: usize = 6;

/// Maximum number of location codes per header
pub const LOCATION_CODES_MAX: usize = 31;

/// Length of the valid time period (TTTT) field
pub const VALID_TIME_PERIOD_LEN: usize = 4;

/// Length of the originator time (JJJHHMM) field
pub const ORIGINATOR_TIME_LEN: usize = 7;

/// Length of the callsign (LLLLLLLL) field
pub const CALLSIGN_LEN: usize = 8;

/// Error constructing a [`Header`]
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum HeaderErr {
    /// A fixed-length field was given with the wrong length
    #[error("field `{0}` must be exactly {1} characters")]
    BadFieldLength(&'static str, usize),

    /// A field contains non-ASCII characters
    #[error("field `{0}` contains non-ASCII characters")]
    NotAscii(&'static str),

    /// No location codes were provided
    #[error("a header requires at least one location code")]
    NoLocations,

    /// More location codes were provided than fit in a header
    #[error("a header may carry at most {LOCATION_CODES_MAX} location codes")]
    TooManyLocations,

    /// The callsign is empty or longer than eight characters
    #[error("callsign must be 1 to {CALLSIGN_LEN} ASCII characters")]
    BadCallsign,

    /// The attention signal duration is outside the legal range
    #[error(
        "attention signal duration must be {ATTN_DURATION_MIN_SECS} \
         to {ATTN_DURATION_MAX_SECS} seconds"
    )]
    AttnDurationOutOfRange,
}

/// A validated SAME message header
///
/// A `Header` describes everything that varies between SAME
/// transmissions: who is speaking ([originator
/// code](Header::originator)), what is happening ([event
/// code](Header::event_code)), where
/// ([location codes](Header::locations)), for how long the
/// message is valid ([valid time period](Header::valid_time_period)),
/// when it was issued ([originator time](Header::originator_time)),
/// the transmitting station's [callsign](Header::callsign), and
/// the duration of the attention signal.
///
/// Construct one with a [`HeaderBuilder`]. Every field is
/// validated there, so a `Header` is always renderable to a
/// legal on-air byte sequence and audio generation from it
/// cannot fail.
///
/// `Header` implements `Display`, which shows the ASCII portion
/// of the frame as it would be received off the air:
///
/// ```
/// use samegen::HeaderBuilder;
///
/// let header = HeaderBuilder::new("WXR", "RWT")
///     .with_location("012345")
///     .with_valid_time_period("0015")
///     .with_originator_time("0321115")
///     .with_callsign("KLOX/NWS")
///     .build()
///     .expect("valid header");
///
/// assert_eq!(
///     "ZCZC-WXR-RWT-012345+0015-0321115-KLOX/NWS-",
///     &format!("{}", header)
/// );
/// ```
///
/// The header does **not** validate domain-level semantics: it
/// will not reject an unassigned event code or a purge time
/// whose quarter-hour arithmetic is off. Callers with stricter
/// requirements should check those before construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    originator: ArrayString<ORIGINATOR_CODE_LEN>,
    event: ArrayString<EVENT_CODE_LEN>,
    locations: ArrayVec<ArrayString<LOCATION_CODE_LEN>, LOCATION_CODES_MAX>,
    valid_time: ArrayString<VALID_TIME_PERIOD_LEN>,
    originator_time: ArrayString<ORIGINATOR_TIME_LEN>,
    callsign: ArrayString<CALLSIGN_LEN>,
    attn_duration: u32,
}

impl Header {
    /// Originator code, like "`WXR`"
    pub fn originator(&self) -> &str {
        &self.originator
    }

    /// Event code, like "`TOR`"
    pub fn event_code(&self) -> &str {
        &self.event
    }

    /// Affected location codes, in transmission order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|loc| loc.as_str())
    }

    /// Count of location codes
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Valid time period (TTTT), like "`0015`"
    pub fn valid_time_period(&self) -> &str {
        &self.valid_time
    }

    /// Originator time (JJJHHMM), like "`0321115`"
    pub fn originator_time(&self) -> &str {
        &self.originator_time
    }

    /// Station callsign, space-padded to eight characters
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Attention signal duration, in seconds
    pub fn attention_duration(&self) -> u32 {
        self.attn_duration
    }
}

/// Builds a [`Header`]
///
/// The originator and event codes are mandatory and given at
/// construction. All other fields are supplied by `with_*`
/// methods; [`build()`](HeaderBuilder::build) validates the
/// result as a whole.
///
/// ```
/// use samegen::{HeaderBuilder, HeaderErr};
///
/// let err = HeaderBuilder::new("WXR", "TO")
///     .with_location("048484")
///     .with_valid_time_period("1000")
///     .with_originator_time("1172221")
///     .with_callsign("WAEB/AM")
///     .build()
///     .unwrap_err();
/// assert_eq!(HeaderErr::BadFieldLength("event code", 3), err);
/// ```
#[derive(Clone, Debug)]
pub struct HeaderBuilder<'a> {
    originator: &'a str,
    event: &'a str,
    locations: ArrayVec<&'a str, LOCATION_CODES_MAX>,
    locations_overflowed: bool,
    valid_time: &'a str,
    originator_time: &'a str,
    #[cfg(feature = "chrono")]
    issue_stamp: Option<ArrayString<ORIGINATOR_TIME_LEN>>,
    callsign: &'a str,
    attn_duration: u32,
}

impl<'a> HeaderBuilder<'a> {
    /// New header with the given originator and event codes
    ///
    /// Both codes must be exactly three ASCII characters, like
    /// "`WXR`" and "`TOR`". The attention signal duration
    /// defaults to the eight-second minimum.
    pub fn new(originator: &'a str, event: &'a str) -> Self {
        Self {
            originator,
            event,
            locations: ArrayVec::new(),
            locations_overflowed: false,
            valid_time: "",
            originator_time: "",
            #[cfg(feature = "chrono")]
            issue_stamp: None,
            callsign: "",
            attn_duration: ATTN_DURATION_MIN_SECS,
        }
    }

    /// Append an affected location code (PSSCCC)
    ///
    /// Location codes are transmitted in the order added. At
    /// most [`LOCATION_CODES_MAX`] codes fit in one header;
    /// adding more causes [`build()`](HeaderBuilder::build) to
    /// fail.
    pub fn with_location(&mut self, location: &'a str) -> &mut Self {
        if self.locations.try_push(location).is_err() {
            self.locations_overflowed = true;
        }
        self
    }

    /// Valid time period (TTTT): four digits, HHMM
    pub fn with_valid_time_period(&mut self, valid_time: &'a str) -> &mut Self {
        self.valid_time = valid_time;
        self
    }

    /// Originator time (JJJHHMM): Julian day, hour, minute (UTC)
    pub fn with_originator_time(&mut self, originator_time: &'a str) -> &mut Self {
        self.originator_time = originator_time;
        self
    }

    /// Originator time from a timestamp
    ///
    /// Formats the JJJHHMM originator time from `issued`,
    /// converted to UTC. Overrides any
    /// [`with_originator_time()`](HeaderBuilder::with_originator_time)
    /// value.
    #[cfg(feature = "chrono")]
    pub fn with_issue_time<Tz: chrono::TimeZone>(&mut self, issued: &chrono::DateTime<Tz>) -> &mut Self {
        use chrono::{Datelike, Timelike};
        use std::fmt::Write;

        let utc = issued.with_timezone(&chrono::Utc);
        let mut stamp = ArrayString::new();
        write!(stamp, "{:03}{:02}{:02}", utc.ordinal(), utc.hour(), utc.minute()).ok();
        self.issue_stamp = Some(stamp);
        self
    }

    /// Station callsign
    ///
    /// One to eight ASCII characters. Shorter callsigns are
    /// right-padded with spaces to the full eight-character
    /// field.
    pub fn with_callsign(&mut self, callsign: &'a str) -> &mut Self {
        self.callsign = callsign;
        self
    }

    /// Attention signal duration, in seconds
    ///
    /// Legal values are 8 through 25 seconds; see
    /// [`attention_duration_bounds()`](crate::attention_duration_bounds).
    pub fn with_attn_duration(&mut self, seconds: u32) -> &mut Self {
        self.attn_duration = seconds;
        self
    }

    /// Validate and build the [`Header`]
    pub fn build(&self) -> Result<Header, HeaderErr> {
        let originator = exact_field("originator code", self.originator)?;
        let event = exact_field("event code", self.event)?;

        if self.locations_overflowed {
            return Err(HeaderErr::TooManyLocations);
        }
        if self.locations.is_empty() {
            return Err(HeaderErr::NoLocations);
        }
        let mut locations = ArrayVec::new();
        for location in &self.locations {
            locations.push(exact_field("location code", location)?);
        }

        let valid_time = exact_field("valid time period", self.valid_time)?;
        let originator_time = self.resolved_originator_time()?;

        if self.callsign.is_empty() || self.callsign.len() > CALLSIGN_LEN {
            return Err(HeaderErr::BadCallsign);
        }
        if !self.callsign.is_ascii() {
            return Err(HeaderErr::NotAscii("callsign"));
        }
        let mut callsign = ArrayString::new();
        callsign.push_str(self.callsign);
        while !callsign.is_full() {
            callsign.push(' ');
        }

        if self.attn_duration < ATTN_DURATION_MIN_SECS || self.attn_duration > ATTN_DURATION_MAX_SECS
        {
            return Err(HeaderErr::AttnDurationOutOfRange);
        }

        Ok(Header {
            originator,
            event,
            locations,
            valid_time,
            originator_time,
            callsign,
            attn_duration: self.attn_duration,
        })
    }

    #[cfg(feature = "chrono")]
    fn resolved_originator_time(&self) -> Result<ArrayString<ORIGINATOR_TIME_LEN>, HeaderErr> {
        match self.issue_stamp {
            Some(stamp) => Ok(stamp),
            None => exact_field("originator time", self.originator_time),
        }
    }

    #[cfg(not(feature = "chrono"))]
    fn resolved_originator_time(&self) -> Result<ArrayString<ORIGINATOR_TIME_LEN>, HeaderErr> {
        exact_field("originator time", self.originator_time)
    }
}

// Copies a field of statically-known length, rejecting length
// mismatches and non-ASCII content.
fn exact_field<const CAP: usize>(
    name: &'static str,
    value: &str,
) -> Result<ArrayString<CAP>, HeaderErr> {
    if value.len() != CAP {
        return Err(HeaderErr::BadFieldLength(name, CAP));
    }
    if !value.is_ascii() {
        return Err(HeaderErr::NotAscii(name));
    }
    ArrayString::from(value).map_err(|_| HeaderErr::BadFieldLength(name, CAP))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder<'a>() -> HeaderBuilder<'a> {
        let mut bld = HeaderBuilder::new("WXR", "TOR");
        bld.with_location("048484")
            .with_location("048024")
            .with_valid_time_period("1000")
            .with_originator_time("1172221")
            .with_callsign("WAEB/AM ")
            .with_attn_duration(8);
        bld
    }

    #[test]
    fn test_build_ok() {
        let header = builder().build().expect("valid header");
        assert_eq!("WXR", header.originator());
        assert_eq!("TOR", header.event_code());
        assert_eq!(2, header.location_count());
        assert_eq!(
            vec!["048484", "048024"],
            header.locations().collect::<Vec<_>>()
        );
        assert_eq!("1000", header.valid_time_period());
        assert_eq!("1172221", header.originator_time());
        assert_eq!("WAEB/AM ", header.callsign());
        assert_eq!(8, header.attention_duration());
    }

    #[test]
    fn test_callsign_padding() {
        let header = builder().with_callsign("KLOX").build().unwrap();
        assert_eq!("KLOX    ", header.callsign());
        assert_eq!(CALLSIGN_LEN, header.callsign().len());
    }

    #[test]
    fn test_field_lengths_enforced() {
        assert_eq!(
            HeaderErr::BadFieldLength("originator code", 3),
            HeaderBuilder::new("WX", "TOR").build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::BadFieldLength("event code", 3),
            HeaderBuilder::new("WXR", "TORN").build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::BadFieldLength("location code", 6),
            builder().with_location("12345").build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::BadFieldLength("valid time period", 4),
            builder().with_valid_time_period("10000").build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::BadFieldLength("originator time", 7),
            builder().with_originator_time("117222").build().unwrap_err()
        );
    }

    #[test]
    fn test_ascii_enforced() {
        assert_eq!(
            HeaderErr::NotAscii("event code"),
            HeaderBuilder::new("WXR", "TÖ")
                .with_location("048484")
                .with_valid_time_period("1000")
                .with_originator_time("1172221")
                .with_callsign("WAEB/AM")
                .build()
                .unwrap_err()
        );
    }

    #[test]
    fn test_location_bounds() {
        let mut bld = HeaderBuilder::new("WXR", "TOR");
        bld.with_valid_time_period("1000")
            .with_originator_time("1172221")
            .with_callsign("WAEB/AM");
        assert_eq!(HeaderErr::NoLocations, bld.build().unwrap_err());

        for _ in 0..LOCATION_CODES_MAX {
            bld.with_location("048484");
        }
        let header = bld.build().expect("31 locations are legal");
        assert_eq!(LOCATION_CODES_MAX, header.location_count());

        bld.with_location("048484");
        assert_eq!(HeaderErr::TooManyLocations, bld.build().unwrap_err());
    }

    #[test]
    fn test_attn_duration_bounds() {
        assert_eq!(
            HeaderErr::AttnDurationOutOfRange,
            builder().with_attn_duration(7).build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::AttnDurationOutOfRange,
            builder().with_attn_duration(26).build().unwrap_err()
        );
        assert_eq!(25, builder().with_attn_duration(25).build().unwrap().attention_duration());
    }

    #[test]
    fn test_bad_callsign() {
        assert_eq!(
            HeaderErr::BadCallsign,
            builder().with_callsign("").build().unwrap_err()
        );
        assert_eq!(
            HeaderErr::BadCallsign,
            builder().with_callsign("KLOX/NWS/").build().unwrap_err()
        );
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_issue_time_stamp() {
        use chrono::TimeZone;

        // 2023-02-01 22:21 UTC is ordinal day 032
        let issued = chrono::Utc.with_ymd_and_hms(2023, 2, 1, 22, 21, 0).unwrap();
        let header = builder().with_issue_time(&issued).build().unwrap();
        assert_eq!("0322221", header.originator_time());
    }
}
