use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The one document shape this tool understands.
///
/// JSON keys follow the upstream feed (`Id`, `first_name`, `last_name`,
/// `City`, `State`) but are matched ignoring ASCII case. When a key appears
/// twice the later value wins, and `null` leaves the field as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Id")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
}

impl Record {
    /// XML root element name.
    pub const ROOT: &'static str = "record";

    /// True when every field holds its zero value.
    pub fn is_empty(&self) -> bool {
        self.id == 0
            && self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    FirstName,
    LastName,
    City,
    State,
}

impl Field {
    const KEYS: [(&'static str, Field); 5] = [
        ("Id", Field::Id),
        ("first_name", Field::FirstName),
        ("last_name", Field::LastName),
        ("City", Field::City),
        ("State", Field::State),
    ];

    fn matching(key: &str) -> Option<Field> {
        Self::KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, field)| *field)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    // top-level `null` decodes to nothing at all
    fn visit_unit<E: de::Error>(self) -> Result<Record, E> {
        Ok(Record::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
        let mut record = Record::default();
        while let Some(key) = map.next_key::<String>()? {
            let Some(field) = Field::matching(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            match field {
                Field::Id => set(&mut record.id, map.next_value()?),
                Field::FirstName => set(&mut record.first_name, map.next_value()?),
                Field::LastName => set(&mut record.last_name, map.next_value()?),
                Field::City => set(&mut record.city, map.next_value()?),
                Field::State => set(&mut record.state, map.next_value()?),
            }
        }
        Ok(record)
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Peak usage of this process sampled while a run's workers were in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub peak_memory_mb: u64,
    pub peak_cpu_percent: f32,
    pub samples: usize,
}

/// Where one URL of the task list ended up.
#[derive(Debug, Clone, Serialize)]
pub struct UrlOutcome {
    pub index: usize,
    pub url: String,
    pub output_path: PathBuf,
    pub error: Option<String>,
}

impl UrlOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub urls_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub outcomes: Vec<UrlOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceUsage>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, elapsed: Duration, mut outcomes: Vec<UrlOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.index);
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            started_at,
            urls_processed: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            elapsed,
            outcomes,
            resources: None,
        }
    }

    pub fn with_resources(mut self, resources: Option<ResourceUsage>) -> Self {
        self.resources = resources;
        self
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
