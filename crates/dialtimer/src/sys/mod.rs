pub mod prefs;
pub mod runtime;
pub mod scheduler;
