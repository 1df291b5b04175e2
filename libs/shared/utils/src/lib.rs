pub mod clock;
pub mod time;
pub mod test_utils;

pub use clock::{Clock, SystemClock};
pub use time::{format_time_of_day, parse_time_of_day, truncate_to_minute, TimeOfDayError};
