//! Slot sampling
//!
//! Each tick every configured slot is looked up in the data source and
//! turned into a printable line. The result is rebuilt from scratch every
//! time; a slot whose path has no value simply has no line this tick.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::DateTime;
use log::trace;

use super::transform::normalize;
use crate::config::SlotConfig;
use crate::traits::DataSource;

/// One slot's printable line for the current tick
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSample {
    /// Label printed before the value
    pub short_code: String,
    /// Normalised value text
    pub display_value: String,
    /// Update time in Unix milliseconds, if the timestamp parsed
    pub timestamp_millis: Option<i64>,
    /// Age of the value when sampled, if the timestamp parsed
    pub age_millis: Option<i64>,
}

impl SlotSample {
    /// Text written to the display: `"<short code>: <value>"`
    pub fn to_print(&self) -> String {
        format!("{}: {}", self.short_code, self.display_value)
    }
}

/// Samples for one tick, indexed like the slot list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    samples: Vec<Option<SlotSample>>,
}

impl RenderState {
    /// Build from per-slot samples
    pub fn from_samples(samples: Vec<Option<SlotSample>>) -> Self {
        Self { samples }
    }

    /// Sample for the slot at zero-based `index`
    pub fn get(&self, index: usize) -> Option<&SlotSample> {
        self.samples.get(index).and_then(Option::as_ref)
    }

    /// Number of slots (present or not)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no slots at all
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of slots with a sample this tick
    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate per-slot samples in slot order
    pub fn iter(&self) -> impl Iterator<Item = Option<&SlotSample>> {
        self.samples.iter().map(Option::as_ref)
    }
}

/// Sample one slot
///
/// `now_ms` is only called when the value carries a parseable timestamp.
/// Whether the slot is active does not matter here.
pub fn sample<S, F>(slot: &SlotConfig, source: &S, now_ms: F) -> Option<SlotSample>
where
    S: DataSource + ?Sized,
    F: FnOnce() -> i64,
{
    let Some(current) = source.current_value(&slot.path) else {
        trace!("no value for {}", slot.path.as_str());
        return None;
    };

    let timestamp_millis = parse_timestamp(&current.timestamp);
    if timestamp_millis.is_none() {
        trace!(
            "unparsable timestamp {:?} for {}",
            current.timestamp.as_str(),
            slot.path.as_str()
        );
    }
    let age_millis = timestamp_millis.map(|ts| now_ms().saturating_sub(ts));

    let display_value = normalize(&current.value, slot.offset, slot.multiplier, &slot.path);

    Some(SlotSample {
        short_code: slot.short_code.clone(),
        display_value,
        timestamp_millis,
        age_millis,
    })
}

/// Sample every slot, in order
pub fn sample_all<S, F>(slots: &[SlotConfig], source: &S, now_ms: F) -> RenderState
where
    S: DataSource + ?Sized,
    F: Fn() -> i64,
{
    let samples = slots
        .iter()
        .map(|slot| sample(slot, source, &now_ms))
        .collect();
    RenderState::from_samples(samples)
}

/// Parse an RFC 3339 timestamp to Unix milliseconds
pub fn parse_timestamp(timestamp: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|t| t.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PathValue;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;
    use serde_json::{json, Value};

    /// Map-backed data source
    struct MockSource {
        values: BTreeMap<String, PathValue>,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                values: BTreeMap::new(),
            }
        }

        fn with(mut self, path: &str, value: Value, timestamp: &str) -> Self {
            self.values
                .insert(path.to_string(), PathValue::new(value, timestamp));
            self
        }
    }

    impl DataSource for MockSource {
        fn current_value(&self, path: &str) -> Option<PathValue> {
            self.values.get(path).cloned()
        }
    }

    const T0: &str = "2024-01-01T00:00:00Z";
    const T0_MS: i64 = 1_704_067_200_000;

    #[test]
    fn test_sample_present_value() {
        let source = MockSource::new().with("navigation.speedOverGround", json!(1.23456), T0);
        let slot = SlotConfig::new("navigation.speedOverGround", "SOG");

        let sample = sample(&slot, &source, || T0_MS + 1500).unwrap();
        assert_eq!(sample.to_print(), "SOG: 1.235");
        assert_eq!(sample.timestamp_millis, Some(T0_MS));
        assert_eq!(sample.age_millis, Some(1500));
    }

    #[test]
    fn test_sample_missing_value() {
        let source = MockSource::new();
        let slot = SlotConfig::new("navigation.speedOverGround", "SOG");
        assert!(sample(&slot, &source, || 0).is_none());
    }

    #[test]
    fn test_bad_timestamp_keeps_value() {
        let source = MockSource::new().with("environment.depth.belowKeel", json!(4.2), "yesterday");
        let slot = SlotConfig::new("environment.depth.belowKeel", "DBK");

        let sample = sample(&slot, &source, || panic!("clock not needed")).unwrap();
        assert_eq!(sample.display_value, "4.200");
        assert_eq!(sample.timestamp_millis, None);
        assert_eq!(sample.age_millis, None);
    }

    #[test]
    fn test_inactive_slot_still_sampled() {
        let source = MockSource::new().with("navigation.headingTrue", json!(1.0), T0);
        let slot = SlotConfig::new("navigation.headingTrue", "HDG").with_active(false);
        assert!(sample(&slot, &source, || T0_MS).is_some());
    }

    #[test]
    fn test_transform_applied() {
        let source =
            MockSource::new().with("environment.outside.temperature", json!(293.15), T0);
        let slot = SlotConfig::new("environment.outside.temperature", "TEMP (C)")
            .with_offset(-273.15);
        let sample = sample(&slot, &source, || T0_MS).unwrap();
        assert_eq!(sample.to_print(), "TEMP (C): 20.000");
    }

    #[test]
    fn test_sample_all_keeps_slot_order() {
        let source = MockSource::new()
            .with("a", json!(1), T0)
            .with("c", json!("x"), T0);
        let slots = [
            SlotConfig::new("a", "A"),
            SlotConfig::new("b", "B"),
            SlotConfig::new("c", "C"),
        ];

        let state = sample_all(&slots, &source, || T0_MS);
        assert_eq!(state.len(), 3);
        assert_eq!(state.present_count(), 2);
        assert_eq!(state.get(0).unwrap().to_print(), "A: 1.000");
        assert!(state.get(1).is_none());
        assert_eq!(state.get(2).unwrap().to_print(), "C: x");
        assert!(state.get(3).is_none());
    }

    #[test]
    fn test_parse_timestamp_fractional() {
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.250Z"), Some(T0_MS + 250));
        assert_eq!(parse_timestamp("2024-01-01T02:00:00+02:00"), Some(T0_MS));
        assert_eq!(parse_timestamp(""), None);
    }
}
