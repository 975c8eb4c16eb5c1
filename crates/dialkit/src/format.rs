use crate::DialUnit;
use derive_more::Display;
use std::str::FromStr;
use thiserror::Error;

/// A duration split into the three dial fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display("{hours:02}:{minutes:02}:{seconds:02}")]
pub struct Hms {
    pub hours: usize,
    pub minutes: usize,
    pub seconds: usize,
}

impl Hms {
    pub fn new(hours: usize, minutes: usize, seconds: usize) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn from_total_seconds(total: u64) -> Self {
        Self {
            hours: (total / 3600) as usize,
            minutes: ((total % 3600) / 60) as usize,
            seconds: (total % 60) as usize,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    pub fn field(&self, unit: DialUnit) -> usize {
        match unit {
            DialUnit::Hours => self.hours,
            DialUnit::Minutes => self.minutes,
            DialUnit::Seconds => self.seconds,
        }
    }

    pub fn field_mut(&mut self, unit: DialUnit) -> &mut usize {
        match unit {
            DialUnit::Hours => &mut self.hours,
            DialUnit::Minutes => &mut self.minutes,
            DialUnit::Seconds => &mut self.seconds,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("duration is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("{field} must be below 60, got {value}")]
    OutOfRange { field: &'static str, value: usize },
    #[error("expected HH:MM:SS, MM:SS or a number of seconds")]
    TooManyParts,
}

impl FromStr for Hms {
    type Err = ParseDurationError;

    /// Accepts `HH:MM:SS`, `MM:SS` or a plain number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseDurationError::Empty);
        }

        let parts = s
            .split(':')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .map_err(|_| ParseDurationError::InvalidNumber(p.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let hms = match parts.as_slice() {
            [secs] => return Ok(Self::from_total_seconds(*secs as u64)),
            [m, s] => Self::new(0, *m, *s),
            [h, m, s] => Self::new(*h, *m, *s),
            _ => return Err(ParseDurationError::TooManyParts),
        };

        if hms.minutes >= 60 {
            return Err(ParseDurationError::OutOfRange {
                field: "minutes",
                value: hms.minutes,
            });
        }
        if hms.seconds >= 60 {
            return Err(ParseDurationError::OutOfRange {
                field: "seconds",
                value: hms.seconds,
            });
        }
        Ok(hms)
    }
}

/// `HH:MM:SS` once an hour or more remains, `MM:SS` below that.
pub fn format_countdown(total_seconds: u64) -> String {
    let hms = Hms::from_total_seconds(total_seconds);
    if hms.hours == 0 {
        format!("{:02}:{:02}", hms.minutes, hms.seconds)
    } else {
        hms.to_string()
    }
}

pub fn format_dial_value(value: usize) -> String {
    format!("{value:02}")
}
