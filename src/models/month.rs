//! Archive months

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A distinct (year, month) pair of entry publication dates, used to build
/// archive navigation.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1 = January
    pub month: u32,
}

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// First day of the month, `None` if `month` is not 1..=12
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
