use std::collections::BTreeSet;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Coarse block of the day a player can commit to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
            DayPeriod::Night => "night",
        }
    }
}

/// One weekly slot, e.g. Friday evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    #[serde(with = "weekday_name")]
    pub day: Weekday,
    pub period: DayPeriod,
}

impl AvailabilitySlot {
    pub const fn new(day: Weekday, period: DayPeriod) -> Self {
        Self { day, period }
    }

    fn sort_key(&self) -> (u32, DayPeriod) {
        (self.day.num_days_from_monday(), self.period)
    }
}

impl Ord for AvailabilitySlot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for AvailabilitySlot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Recurring weekly availability, kept ordered Monday morning through Sunday night.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    slots: BTreeSet<AvailabilitySlot>,
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a slot on or off, returning whether it is now set.
    pub fn toggle(&mut self, slot: AvailabilitySlot) -> bool {
        if self.slots.remove(&slot) {
            false
        } else {
            self.slots.insert(slot);
            true
        }
    }

    pub fn contains(&self, slot: &AvailabilitySlot) -> bool {
        self.slots.contains(slot)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &AvailabilitySlot> {
        self.slots.iter()
    }

    /// Slots both players have open, in weekly order.
    pub fn overlap(&self, other: &WeeklyAvailability) -> Vec<AvailabilitySlot> {
        self.slots.intersection(&other.slots).copied().collect()
    }
}

impl FromIterator<AvailabilitySlot> for WeeklyAvailability {
    fn from_iter<I: IntoIterator<Item = AvailabilitySlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl Serialize for WeeklyAvailability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slots())
    }
}

impl<'de> Deserialize<'de> for WeeklyAvailability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots = Vec::<AvailabilitySlot>::deserialize(deserializer)?;
        Ok(slots.into_iter().collect())
    }
}

mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        let name = match day {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        };
        serializer.serialize_str(name)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<Weekday>()
            .map_err(|_| serde::de::Error::custom(format!("unknown weekday '{raw}'")))
    }
}
