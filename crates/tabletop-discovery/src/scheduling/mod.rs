pub mod availability;

pub use availability::{AvailabilitySlot, DayPeriod, WeeklyAvailability};
