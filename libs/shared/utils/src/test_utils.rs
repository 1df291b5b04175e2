use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::clock::Clock;
use crate::time::parse_time_of_day;

/// Clock pinned to a settable clinic-local instant. `now()` reports the same
/// instant as UTC.
pub struct FixedClock {
    local: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn at(date: &str, time: &str) -> Self {
        Self {
            local: Mutex::new(test_date(date).and_time(test_time(time))),
        }
    }

    pub fn shared(date: &str, time: &str) -> Arc<Self> {
        Arc::new(Self::at(date, time))
    }

    pub fn set_time(&self, time: &str) {
        let mut local = self.local.lock().unwrap_or_else(PoisonError::into_inner);
        *local = local.date().and_time(test_time(time));
    }

    pub fn advance(&self, by: Duration) {
        let mut local = self.local.lock().unwrap_or_else(PoisonError::into_inner);
        *local += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.local_now().and_utc()
    }

    fn local_now(&self) -> NaiveDateTime {
        *self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse a "HH:MM" literal in a test.
pub fn test_time(raw: &str) -> NaiveTime {
    parse_time_of_day(raw).unwrap_or_else(|e| panic!("bad test time: {e}"))
}

/// Parse a "YYYY-MM-DD" literal in a test.
pub fn test_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| panic!("bad test date '{raw}': {e}"))
}
