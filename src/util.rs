//! Small shared helpers: the allowed-method set and date formatting.
//!
//! Adapted from the teacher's `util.rs`: same `bitflags!` shape for
//! `DavMethod`, trimmed to the verbs this read-only server actually
//! recognises (everything else falls through to the uniform 405 of §4.3).

use bitflags::bitflags;
use time::format_description::well_known::Rfc3339;
use time::macros::offset;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DavMethod: u32 {
        const OPTIONS  = 0x01;
        const GET      = 0x02;
        const HEAD     = 0x04;
        const PROPFIND = 0x08;
    }
}

impl DavMethod {
    pub const ALLOWED: Self = Self::all();

    /// The `Allow` header value advertised by OPTIONS and every 405 (§4.3).
    pub fn allow_header() -> &'static str {
        "OPTIONS, GET, HEAD, PROPFIND"
    }
}

/// Translate a request method string into our enum, or `None` if it's not
/// one of the four verbs this server implements.
pub fn dav_method(m: &str) -> Option<DavMethod> {
    match m.to_ascii_uppercase().as_str() {
        "OPTIONS" => Some(DavMethod::OPTIONS),
        "GET" => Some(DavMethod::GET),
        "HEAD" => Some(DavMethod::HEAD),
        "PROPFIND" => Some(DavMethod::PROPFIND),
        _ => None,
    }
}

pub fn systemtime_to_offsetdatetime(t: std::time::SystemTime) -> time::OffsetDateTime {
    match t.duration_since(std::time::UNIX_EPOCH) {
        Ok(d) => {
            let tm = time::OffsetDateTime::from_unix_timestamp(d.as_secs() as i64)
                .unwrap_or(time::OffsetDateTime::UNIX_EPOCH);
            tm.to_offset(offset!(UTC))
        }
        Err(_) => time::OffsetDateTime::UNIX_EPOCH.to_offset(offset!(UTC)),
    }
}

/// RFC 1123 ("Last-Modified"/"getlastmodified") formatting, hand-rolled
/// since `headers::Date` (the teacher's original route to this string)
/// isn't part of this crate's dependency set (no typed-header machinery
/// without hyper).
pub fn systemtime_to_rfc1123(t: std::time::SystemTime) -> String {
    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let odt = systemtime_to_offsetdatetime(t);
    let weekday = WEEKDAYS[odt.weekday().number_days_from_monday() as usize];
    let month = MONTHS[odt.month() as u8 as usize - 1];
    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        weekday,
        odt.day(),
        month,
        odt.year(),
        odt.hour(),
        odt.minute(),
        odt.second()
    )
}

pub fn systemtime_to_rfc3339(t: std::time::SystemTime) -> String {
    systemtime_to_offsetdatetime(t)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Inverse of `systemtime_to_offsetdatetime`, used by adapters (ZIP, TAR)
/// that get their mtimes from a date/time triplet in an archive entry
/// header rather than directly as a `SystemTime`.
pub fn calendar_to_systemtime(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> std::time::SystemTime {
    let month = time::Month::try_from(month.clamp(1, 12)).unwrap_or(time::Month::January);
    let date = time::Date::from_calendar_date(year, month, day.clamp(1, 28))
        .unwrap_or(time::Date::from_ordinal_date(1970, 1).unwrap());
    let time_of_day =
        time::Time::from_hms(hour.min(23), minute.min(59), second.min(59)).unwrap_or(time::Time::MIDNIGHT);
    let odt = date.with_time(time_of_day).assume_utc();
    let secs = odt.unix_timestamp();
    if secs >= 0 {
        std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs as u64)
    } else {
        std::time::UNIX_EPOCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_rfc3339() {
        assert!(systemtime_to_rfc3339(UNIX_EPOCH) == "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_rfc1123_epoch() {
        assert_eq!(systemtime_to_rfc1123(UNIX_EPOCH), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn unknown_method_is_none() {
        assert!(dav_method("PUT").is_none());
        assert!(dav_method("DELETE").is_none());
    }

    #[test]
    fn known_methods_roundtrip() {
        assert_eq!(dav_method("get"), Some(DavMethod::GET));
        assert_eq!(dav_method("PROPFIND"), Some(DavMethod::PROPFIND));
    }
}
