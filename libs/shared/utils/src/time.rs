//! Minute-resolution time-of-day values in zero-padded 24-hour "HH:MM" form.
//!
//! Zero-padded "HH:MM" strings sort the same way as the times they denote, so
//! comparing parsed [`NaiveTime`]s truncated to the minute gives the same answer
//! as comparing the strings.

use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("time-of-day pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time of day '{0}', expected zero-padded HH:MM")]
pub struct TimeOfDayError(pub String);

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, TimeOfDayError> {
    let captures = TIME_OF_DAY
        .captures(raw.trim())
        .ok_or_else(|| TimeOfDayError(raw.to_string()))?;

    let hour: u32 = captures[1].parse().map_err(|_| TimeOfDayError(raw.to_string()))?;
    let minute: u32 = captures[2].parse().map_err(|_| TimeOfDayError(raw.to_string()))?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeOfDayError(raw.to_string()))
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Serde adapter for `NaiveTime` fields carried as "HH:MM".
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time_of_day(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match time {
                Some(time) => serializer.serialize_some(&super::super::format_time_of_day(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::super::parse_time_of_day(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
