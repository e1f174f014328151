//! Module containing functionality related to BSON DateTimes.
//! For more information, see the documentation for the [`DateTime`] type.

use std::{
    fmt::{self, Display},
    time::{Duration, SystemTime},
};

#[cfg(feature = "chrono-0_4")]
use chrono::{LocalResult, TimeZone, Utc};
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};

/// Struct representing a BSON datetime.
/// Note: BSON datetimes have millisecond precision. Anything finer is dropped when the value is
/// constructed, never later when it is encoded.
///
/// To enable conversions between this type and [`chrono::DateTime`], enable the `"chrono-0_4"`
/// feature flag in your `Cargo.toml`.
///
/// ```
/// # fn main() -> bson_core::error::Result<()> {
/// let dt = bson_core::DateTime::parse_rfc3339_str("1998-02-12T00:01:00.023Z")?;
/// assert_eq!(dt.timestamp_millis(), 887_241_660_023);
/// assert_eq!(dt.try_to_rfc3339_string()?, "1998-02-12T00:01:00.023Z");
/// # Ok(())
/// # }
/// ```
///
/// ## Serde integration
///
/// Inside a [`crate::Encoder`] a `DateTime` field is written according to the encoder's
/// [`DateEncodingStrategy`](crate::ser::DateEncodingStrategy); the default produces a BSON
/// datetime. Other serializers receive the canonical Extended JSON form,
/// `{"$date": {"$numberLong": "<millis>"}}`.
///
/// ## Large Dates
/// The range of dates supported by `DateTime` is defined by [`DateTime::MIN`] and
/// [`DateTime::MAX`]. Formatting and parsing RFC 3339 strings is bounded by the [`time`] crate's
/// supported range. The `large_dates` feature widens that range.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone)]
pub struct DateTime(i64);

/// Newtype name [`DateTime`]'s serde impls use so the crate's encoder and decoder can apply
/// their date strategies.
pub(crate) const DATETIME_NEWTYPE_NAME: &str = "$__bson_core_private_datetime";

impl crate::DateTime {
    /// The latest possible date that can be represented in BSON.
    pub const MAX: Self = Self::from_millis(i64::MAX);

    /// The earliest possible date that can be represented in BSON.
    pub const MIN: Self = Self::from_millis(i64::MIN);

    /// Makes a new [`DateTime`] from the number of non-leap milliseconds since
    /// January 1, 1970 0:00:00 UTC (aka "UNIX timestamp").
    pub const fn from_millis(date: i64) -> Self {
        Self(date)
    }

    /// Returns a [`DateTime`] which corresponds to the current date and time.
    pub fn now() -> DateTime {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert the given [`chrono::DateTime`] into a [`DateTime`], truncating it to
    /// millisecond precision.
    #[cfg(feature = "chrono-0_4")]
    pub fn from_chrono<T: chrono::TimeZone>(dt: chrono::DateTime<T>) -> Self {
        Self::from_millis(dt.timestamp_millis())
    }

    /// Convert this [`DateTime`] to a [`chrono::DateTime<Utc>`].
    ///
    /// Note: Not every BSON datetime can be represented as a [`chrono::DateTime`]. For such dates,
    /// [`chrono::DateTime::MIN_UTC`] or [`chrono::DateTime::MAX_UTC`] will be returned, whichever
    /// is closer.
    #[cfg(feature = "chrono-0_4")]
    pub fn to_chrono(self) -> chrono::DateTime<Utc> {
        match Utc.timestamp_millis_opt(self.0) {
            LocalResult::Single(dt) => dt,
            _ => {
                if self.0 < 0 {
                    chrono::DateTime::<Utc>::MIN_UTC
                } else {
                    chrono::DateTime::<Utc>::MAX_UTC
                }
            }
        }
    }

    /// Convert the given [`time::OffsetDateTime`] into a [`DateTime`], truncating it to
    /// millisecond precision and saturating at [`DateTime::MIN`] and [`DateTime::MAX`].
    pub fn from_time(dt: time::OffsetDateTime) -> Self {
        let millis = dt.unix_timestamp_nanos() / 1_000_000;
        match millis.try_into() {
            Ok(ts) => Self::from_millis(ts),
            _ => {
                if millis > 0 {
                    Self::MAX
                } else {
                    Self::MIN
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`time::OffsetDateTime`], or `None` when it lies outside
    /// the range the `time` crate supports.
    pub fn to_time(self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::UNIX_EPOCH.checked_add(time::Duration::milliseconds(self.0))
    }

    /// Convert the given [`std::time::SystemTime`] to a [`DateTime`].
    ///
    /// If the provided time is too far in the future or too far in the past to be represented
    /// by a BSON datetime, either [`DateTime::MAX`] or [`DateTime::MIN`] will be
    /// returned, whichever is closer.
    pub fn from_system_time(st: SystemTime) -> Self {
        match st.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => {
                if d.as_millis() <= i64::MAX as u128 {
                    Self::from_millis(d.as_millis() as i64)
                } else {
                    Self::MAX
                }
            }
            // before the epoch
            Err(e) => {
                let millis = e.duration().as_millis();
                if millis > i64::MAX as u128 {
                    Self::MIN
                } else {
                    Self::from_millis(-(millis as i64))
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`std::time::SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            SystemTime::UNIX_EPOCH + Duration::from_millis(self.0 as u64)
        } else {
            // i64::MIN.abs() overflows, so widen first
            SystemTime::UNIX_EPOCH - Duration::from_millis((self.0 as i128).unsigned_abs() as u64)
        }
    }

    /// Returns the number of non-leap-milliseconds since January 1, 1970 UTC.
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    /// Adds `millis` milliseconds to the [`DateTime`] saturating at [`DateTime::MIN`] and
    /// [`DateTime::MAX`].
    pub const fn saturating_add_millis(self, millis: i64) -> Self {
        Self::from_millis(self.0.saturating_add(millis))
    }

    /// Adds `duration` to the [`DateTime`] saturating at [`DateTime::MAX`].
    ///
    /// Only the whole milliseconds of `duration` are used.
    pub const fn saturating_add_duration(self, duration: Duration) -> Self {
        let millis = duration.as_millis();
        if millis > i64::MAX as u128 {
            Self::from_millis(i64::MAX)
        } else {
            self.saturating_add_millis(millis as i64)
        }
    }

    /// Convert this [`DateTime`] to an RFC 3339 formatted string.
    pub fn try_to_rfc3339_string(self) -> Result<String> {
        let dt = self.to_time().ok_or_else(|| {
            Error::cannot_format_datetime(format!("{} ms is out of range", self.0))
        })?;
        dt.format(&Rfc3339).map_err(Error::cannot_format_datetime)
    }

    /// Convert the given RFC 3339 formatted string to a [`DateTime`], truncating it to millisecond
    /// precision.
    pub fn parse_rfc3339_str(s: impl AsRef<str>) -> Result<Self> {
        let odt = time::OffsetDateTime::parse(s.as_ref(), &Rfc3339)
            .map_err(Error::invalid_datetime_value)?;
        Ok(Self::from_time(odt))
    }

    /// Whether relaxed Extended JSON renders this value as an ISO-8601 string. Only years 1970
    /// through 9999 qualify.
    pub(crate) fn is_relaxed_extjson_range(self) -> bool {
        (0..=253_402_300_799_999).contains(&self.0)
    }

    /// Returns the time elapsed since `earlier`, or `None` if the given `DateTime` is later than
    /// this one.
    pub fn checked_duration_since(self, earlier: Self) -> Option<Duration> {
        if earlier.0 > self.0 {
            return None;
        }
        let diff = (self.0 as i128) - (earlier.0 as i128);
        Some(Duration::from_millis(diff as u64))
    }

    /// Returns the time elapsed since `earlier`, or a [`Duration`] of zero if the given `DateTime`
    /// is later than this one.
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        self.checked_duration_since(earlier)
            .unwrap_or(Duration::ZERO)
    }
}

impl fmt::Debug for crate::DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple("DateTime");
        match self.to_time() {
            Some(dt) => tup.field(&dt),
            _ => tup.field(&self.0),
        };
        tup.finish()
    }
}

impl Display for crate::DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_to_rfc3339_string() {
            Ok(s) => f.write_str(&s),
            _ => Display::fmt(&self.0, f),
        }
    }
}

impl From<SystemTime> for crate::DateTime {
    fn from(st: SystemTime) -> Self {
        Self::from_system_time(st)
    }
}

impl From<crate::DateTime> for SystemTime {
    fn from(dt: crate::DateTime) -> Self {
        dt.to_system_time()
    }
}

impl From<time::OffsetDateTime> for crate::DateTime {
    fn from(dt: time::OffsetDateTime) -> Self {
        Self::from_time(dt)
    }
}

#[cfg(feature = "chrono-0_4")]
impl From<crate::DateTime> for chrono::DateTime<Utc> {
    fn from(bson_dt: DateTime) -> Self {
        bson_dt.to_chrono()
    }
}

#[cfg(feature = "chrono-0_4")]
impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for crate::DateTime {
    fn from(x: chrono::DateTime<T>) -> Self {
        Self::from_chrono(x)
    }
}
