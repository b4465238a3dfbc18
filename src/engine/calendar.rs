//! Local calendar helpers.
//!
//! Calendar dates are always derived by converting an instant into the local time zone and
//! decomposing it into year, month and day. Instants are never truncated in UTC.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};

/// The calendar date of `instant` in the time zone `tz`.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Formats `date` as `YYYY-MM-DD` from its year, month and day.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// The instant at which `date` begins (00:00:00) in the time zone of `now`.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> DateTime<Utc> {
    resolve(date.and_time(NaiveTime::MIN), now)
}

/// The instant for `date` at the local time-of-day of `now`, to whole seconds.
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> DateTime<Utc> {
    let time =
        NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second()).unwrap_or(NaiveTime::MIN);
    resolve(date.and_time(time), now)
}

/// Converts a local wall-clock time in the zone of `now` to an instant. Ambiguous times resolve to
/// the earlier instant; times skipped by a DST transition use the offset in effect at `now`.
fn resolve<Tz: TimeZone>(naive: NaiveDateTime, now: &DateTime<Tz>) -> DateTime<Utc> {
    match now.timezone().from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let offset = now.offset().fix();
            Utc.from_utc_datetime(&(naive - offset))
        }
    }
}
