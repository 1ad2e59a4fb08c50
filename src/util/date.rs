use std::io;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::meta::MetaValue;

/// First `YYYY-MM-DD` found in `name`. Field values the calendar rejects give `None`.
pub fn extract_date_from_path(name: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref PATH_DATE_REGEX: Regex = Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").unwrap();
    }

    let caps = PATH_DATE_REGEX.captures(name)?;
    let y: i32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    let d: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A bare date becomes midnight of that day. Every other value is returned untouched.
pub fn coerce_to_timestamp(value: MetaValue) -> MetaValue {
    match value {
        MetaValue::Date(date) => MetaValue::Timestamp(midnight(date)),
        other => other,
    }
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last modification time of `path`, in local time.
pub fn modified_time(path: &Path) -> io::Result<NaiveDateTime> {
    let modified = path.metadata()?.modified()?;
    let local: DateTime<Local> = modified.into();
    Ok(local.naive_local())
}
