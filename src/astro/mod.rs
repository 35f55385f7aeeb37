//! Sidereal time and horizontal altitude.
//!
//! Only what the visibility filter needs: mean sidereal time from a UTC
//! instant and the altitude of an equatorial position for an observer.
//! All angles are in degrees.

use chrono::{DateTime, FixedOffset, Utc};

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian date of J2000.0.
const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Greenwich mean sidereal time in degrees, [0, 360).
pub fn greenwich_sidereal_time(instant: DateTime<Utc>) -> f64 {
    let d = julian_date(instant) - J2000_JD;
    let t = d / DAYS_PER_CENTURY;

    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;

    normalize_degrees(gmst)
}

/// Local mean sidereal time in degrees, [0, 360).
///
/// Latitude does not enter the formula; it is accepted so callers can pass
/// an observer position as a whole.
pub fn local_sidereal_time(instant: DateTime<Utc>, _latitude: f64, longitude: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_time(instant) + longitude)
}

/// Altitude above the horizon in degrees, [-90, 90].
pub fn altitude(lst: f64, ra: f64, dec: f64, latitude: f64) -> f64 {
    let hour_angle = (lst - ra).to_radians();
    let dec = dec.to_radians();
    let lat = latitude.to_radians();

    let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hour_angle.cos();

    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Parse an ISO 8601 / RFC 3339 timestamp carrying `Z` or an offset.
///
/// Anything else is `None`; callers treat that as "no time given".
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
