pub mod controller;
pub mod format;
pub mod geometry;
pub mod host;
pub mod schedule;
pub mod selector;

pub use controller::{ControllerConfig, ControllerError, CountdownController, DialAction, TimerState};
pub use geometry::{DialGeometry, GeometryError, Point};
pub use schedule::{ManualScheduler, Scheduler, TaskKey, Ticket};
pub use selector::{AngularSelector, AnimationStatus, DialFrame, SelectorError};

use strum::{Display, EnumIter, EnumString};

/// The three duration fields a dial can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum DialUnit {
    #[strum(to_string = "hours", serialize = "h")]
    Hours,
    #[strum(to_string = "minutes", serialize = "m")]
    Minutes,
    #[strum(to_string = "seconds", serialize = "s")]
    Seconds,
}

impl DialUnit {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hours => "hrs",
            Self::Minutes => "min",
            Self::Seconds => "sec",
        }
    }
}
