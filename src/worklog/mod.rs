pub mod duration;

pub use duration::{
    DurationUnit, WorkDuration, format_duration, format_seconds, parse_duration,
    validate_duration,
};
