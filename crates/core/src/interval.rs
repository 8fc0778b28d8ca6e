//! Bar interval specification for price series requests.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of the bars requested from a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    FourHours,
    OneDay,
    OneWeek,
    OneMonth,
}

impl Interval {
    /// Returns the provider string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }

    /// Returns true if several bars of this interval can share one calendar day.
    #[must_use]
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::OneMinute
                | Interval::FiveMinutes
                | Interval::FifteenMinutes
                | Interval::ThirtyMinutes
                | Interval::OneHour
                | Interval::FourHours
        )
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        // "1M" is case-sensitive to distinguish month from minute
        if s == "1M" || s == "1mo" {
            return Ok(Interval::OneMonth);
        }

        match s.to_lowercase().as_str() {
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" | "60m" => Ok(Interval::OneHour),
            "4h" => Ok(Interval::FourHours),
            "1d" => Ok(Interval::OneDay),
            "1w" | "1wk" => Ok(Interval::OneWeek),
            _ => Err(anyhow!(
                "Invalid interval: '{}'. Valid values: 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w, 1M",
                s
            )),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yahoo_style_aliases() {
        assert_eq!("1wk".parse::<Interval>().unwrap(), Interval::OneWeek);
        assert_eq!("1mo".parse::<Interval>().unwrap(), Interval::OneMonth);
        assert_eq!("60m".parse::<Interval>().unwrap(), Interval::OneHour);
    }

    #[test]
    fn month_is_case_sensitive() {
        assert_eq!("1M".parse::<Interval>().unwrap(), Interval::OneMonth);
        assert_eq!("1m".parse::<Interval>().unwrap(), Interval::OneMinute);
    }

    #[test]
    fn rejects_unknown_interval() {
        let err = "2d".parse::<Interval>().unwrap_err();
        assert!(err.to_string().contains("Invalid interval"));
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Interval::OneDay).unwrap();
        assert_eq!(json, "\"1d\"");
        let back: Interval = serde_json::from_str("\"1h\"").unwrap();
        assert_eq!(back, Interval::OneHour);
    }

    #[test]
    fn intraday_intervals() {
        assert!(Interval::OneHour.is_intraday());
        assert!(!Interval::OneDay.is_intraday());
    }
}
