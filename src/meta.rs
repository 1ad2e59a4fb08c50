use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Open metadata mapping of a post. Keys are free form, values are typed.
pub type Metadata = BTreeMap<String, MetaValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    List(Vec<MetaValue>),
    Map(Metadata),
}

impl MetaValue {
    /// Absent, null and blank strings do not count as a value when falling back.
    pub fn is_empty(&self) -> bool {
        match self {
            MetaValue::Null => true,
            MetaValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            MetaValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Text form of a scalar. Lists, maps and null have none.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            MetaValue::Null | MetaValue::List(_) | MetaValue::Map(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Types a plain scalar the way YAML 1.1 loaders do for timestamps:
    /// `2024-03-01` is a date, `2024-03-01 10:20:30` is a timestamp, anything else stays text.
    pub fn from_scalar_str(text: &str) -> MetaValue {
        parse_yaml_date(text)
            .map(MetaValue::Date)
            .or_else(|| parse_yaml_timestamp(text).map(MetaValue::Timestamp))
            .unwrap_or_else(|| MetaValue::String(text.to_string()))
    }
}

impl Display for MetaValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => write!(f, ""),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Integer(i) => write!(f, "{}", i),
            MetaValue::Float(x) => write!(f, "{}", x),
            MetaValue::String(s) => write!(f, "{}", s),
            MetaValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            MetaValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            MetaValue::List(items) => {
                let items: Vec<String> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            MetaValue::Map(map) => {
                let items: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::String(value)
    }
}

impl From<NaiveDateTime> for MetaValue {
    fn from(value: NaiveDateTime) -> Self {
        MetaValue::Timestamp(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value.into_iter().map(MetaValue::String).collect())
    }
}

impl From<serde_yaml::Value> for MetaValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    MetaValue::Integer(i)
                } else {
                    MetaValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => MetaValue::from_scalar_str(&s),
            Value::Sequence(seq) => MetaValue::List(seq.into_iter().map(MetaValue::from).collect()),
            Value::Mapping(mapping) => MetaValue::Map(mapping_to_metadata(mapping)),
            Value::Tagged(tagged) => MetaValue::from(tagged.value),
        }
    }
}

pub fn mapping_to_metadata(mapping: serde_yaml::Mapping) -> Metadata {
    mapping.into_iter()
        .filter_map(|(key, value)| {
            let key = MetaValue::from(key).scalar_text()?;
            Some((key, MetaValue::from(value)))
        })
        .collect()
}

fn parse_yaml_date(text: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap();
    }

    let caps = DATE_REGEX.captures(text.trim())?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

fn parse_yaml_timestamp(text: &str) -> Option<NaiveDateTime> {
    lazy_static! {
        static ref TIMESTAMP_REGEX: Regex = Regex::new(
            r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:[Tt]|[ \t]+)([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?(?:\.([0-9]+))?[ \t]*(Z|[-+][0-9]{1,2}(?::?[0-9]{2})?)?$"
        ).unwrap();
    }

    let caps = TIMESTAMP_REGEX.captures(text.trim())?;
    let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)?;

    let second: u32 = match caps.get(6) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    let nanos: u32 = match caps.get(7) {
        Some(frac) => {
            let digits: String = frac.as_str().chars().chain(std::iter::repeat('0')).take(9).collect();
            digits.parse().ok()?
        }
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(caps[4].parse().ok()?, caps[5].parse().ok()?, second, nanos)?;
    let naive = NaiveDateTime::new(date, time);

    match caps.get(8).map(|m| m.as_str()) {
        None => Some(naive),
        Some("Z") => Some(Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local()),
        Some(offset) => {
            let offset = parse_offset(offset)?;
            let zoned = offset.from_local_datetime(&naive).single()?;
            Some(zoned.with_timezone(&Local).naive_local())
        }
    }
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        3 | 4 => {
            let split = digits.len() - 2;
            (digits[..split].parse::<i32>().ok()?, digits[split..].parse::<i32>().ok()?)
        }
        _ => return None,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
