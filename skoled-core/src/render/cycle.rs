//! Render cycle
//!
//! One tick = sample every slot, open the display, redraw the whole frame.
//! There is no diffing against the previous frame: the panel is cleared and
//! only the lines present this tick are written, so stale text never
//! survives.

use log::{debug, warn};

use super::layout::Layout;
use crate::config::{ActivationConfig, SlotConfig};
use crate::telemetry::{sample_all, RenderState};
use crate::traits::{DataSource, DisplayError, DisplayOpener, OledDisplay};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Frame written with this many slot lines
    Rendered { lines: usize },
    /// The display could not be opened; nothing was drawn
    OpenFailed(DisplayError),
    /// The display opened but a write failed part way
    RenderFailed(DisplayError),
}

impl CycleOutcome {
    /// Whether the frame reached the panel
    pub fn is_rendered(&self) -> bool {
        matches!(self, CycleOutcome::Rendered { .. })
    }
}

/// Draw one full frame
///
/// Sequence: power on, clear, normal contrast, normal polarity, then each
/// active slot that has a sample, in slot order, then flush. Returns the
/// number of lines written.
pub fn render<D>(
    state: &RenderState,
    slots: &[SlotConfig],
    layout: &Layout,
    display: &mut D,
) -> Result<usize, DisplayError>
where
    D: OledDisplay + ?Sized,
{
    display.power(true)?;
    display.clear()?;
    display.dim(false)?;
    display.invert(false)?;

    let style = layout.text_style();
    let mut lines = 0;

    for (index, slot) in slots.iter().enumerate() {
        if !slot.active {
            continue;
        }
        let Some(sample) = state.get(index) else {
            continue;
        };

        let (x, y) = layout.position(index);
        display.set_cursor(x, y)?;
        display.write_text(&sample.to_print(), &style)?;
        lines += 1;
    }

    display.flush()?;
    Ok(lines)
}

/// Run one complete tick: sample, open, render, release
///
/// Device failures are logged and reported, never propagated; the next
/// tick simply tries again.
pub fn run_cycle<S, O, F>(
    activation: &ActivationConfig,
    source: &S,
    opener: &mut O,
    now_ms: F,
) -> CycleOutcome
where
    S: DataSource + ?Sized,
    O: DisplayOpener + ?Sized,
    F: Fn() -> i64,
{
    let state = sample_all(&activation.slots, source, now_ms);

    // The handle lives for this scope only; dropping it releases the bus
    let mut display = match opener.open(activation.bus_number, activation.address) {
        Ok(display) => display,
        Err(e) => {
            warn!(
                "cannot open display on bus {} at {}: {}",
                activation.bus_number, activation.address, e
            );
            return CycleOutcome::OpenFailed(e);
        }
    };

    match render(&state, &activation.slots, &activation.layout, &mut display) {
        Ok(lines) => {
            debug!(
                "frame rendered: {} of {} slots present, {} drawn",
                state.present_count(),
                state.len(),
                lines
            );
            CycleOutcome::Rendered { lines }
        }
        Err(e) => {
            warn!("render cycle abandoned: {}", e);
            CycleOutcome::RenderFailed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginConfig;
    use crate::traits::{PathValue, TextStyle};
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use serde_json::{json, Value};
    use skoled_hal::{BusAddress, I2cBusError};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Power(bool),
        Clear,
        Dim(bool),
        Invert(bool),
        Cursor(u8, u8),
        Text(String),
        Flush,
    }

    /// Display that records every call
    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
        fail_on_text: bool,
    }

    impl RecordingDisplay {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn cursors(&self) -> Vec<(u8, u8)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Cursor(x, y) => Some((*x, *y)),
                    _ => None,
                })
                .collect()
        }
    }

    impl OledDisplay for RecordingDisplay {
        fn power(&mut self, on: bool) -> Result<(), DisplayError> {
            self.calls.push(Call::Power(on));
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn dim(&mut self, on: bool) -> Result<(), DisplayError> {
            self.calls.push(Call::Dim(on));
            Ok(())
        }

        fn invert(&mut self, on: bool) -> Result<(), DisplayError> {
            self.calls.push(Call::Invert(on));
            Ok(())
        }

        fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
            self.calls.push(Call::Cursor(x, y));
            Ok(())
        }

        fn write_text(&mut self, text: &str, _style: &TextStyle) -> Result<(), DisplayError> {
            if self.fail_on_text {
                return Err(DisplayError::Communication(I2cBusError::Nack));
            }
            self.calls.push(Call::Text(text.to_string()));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Flush);
            Ok(())
        }
    }

    struct MockSource(BTreeMap<String, PathValue>);

    impl MockSource {
        fn new(entries: &[(&str, Value)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(p, v)| {
                        (
                            p.to_string(),
                            PathValue::new(v.clone(), "2024-01-01T00:00:00Z"),
                        )
                    })
                    .collect(),
            )
        }
    }

    impl DataSource for MockSource {
        fn current_value(&self, path: &str) -> Option<PathValue> {
            self.0.get(path).cloned()
        }
    }

    /// Opener handing out a fresh recording display per tick
    struct CountingOpener {
        opens: usize,
        fail_open: bool,
        fail_on_text: bool,
    }

    fn activation(slots: &[SlotConfig]) -> ActivationConfig {
        let config = PluginConfig {
            slots: slots.to_vec(),
            ..PluginConfig::default()
        };
        config.validate().unwrap()
    }

    fn frame_for(slots: &[SlotConfig], source: &MockSource) -> RecordingDisplay {
        let state = sample_all(slots, source, || 0);
        let mut display = RecordingDisplay::default();
        render(&state, slots, &Layout::default(), &mut display).unwrap();
        display
    }

    #[test]
    fn test_sequence_order() {
        let slots = [SlotConfig::new("navigation.speedOverGround", "SOG")];
        let source = MockSource::new(&[("navigation.speedOverGround", json!(1.23456))]);

        let display = frame_for(&slots, &source);
        assert_eq!(
            display.calls,
            [
                Call::Power(true),
                Call::Clear,
                Call::Dim(false),
                Call::Invert(false),
                Call::Cursor(1, 18),
                Call::Text("SOG: 1.235".to_string()),
                Call::Flush,
            ]
        );
    }

    #[test]
    fn test_absent_slot_not_written() {
        let slots = [
            SlotConfig::new("a", "A"),
            SlotConfig::new("b", "B"),
            SlotConfig::new("c", "C"),
            SlotConfig::new("d", "D"),
        ];
        let source = MockSource::new(&[("a", json!(1)), ("c", json!(3)), ("d", json!(4))]);

        let display = frame_for(&slots, &source);
        assert_eq!(display.texts(), ["A: 1.000", "C: 3.000", "D: 4.000"]);
        // Slot 2's row stays empty; others keep their fixed rows
        assert_eq!(display.cursors(), [(1, 18), (1, 38), (1, 48)]);
    }

    #[test]
    fn test_inactive_slot_not_written() {
        let slots = [
            SlotConfig::new("a", "A").with_active(false),
            SlotConfig::new("b", "B"),
        ];
        let source = MockSource::new(&[("a", json!(1)), ("b", json!(2))]);

        let state = sample_all(&slots, &source, || 0);
        assert_eq!(state.present_count(), 2);

        let mut display = RecordingDisplay::default();
        let lines = render(&state, &slots, &Layout::default(), &mut display).unwrap();
        assert_eq!(lines, 1);
        assert_eq!(display.texts(), ["B: 2.000"]);
        assert_eq!(display.cursors(), [(1, 28)]);
    }

    #[test]
    fn test_empty_frame_still_cleared() {
        let slots = [SlotConfig::new("a", "A")];
        let source = MockSource::new(&[]);

        let display = frame_for(&slots, &source);
        assert!(display.calls.contains(&Call::Clear));
        assert!(display.texts().is_empty());
        assert_eq!(display.calls.last(), Some(&Call::Flush));
    }

    #[test]
    fn test_write_failure_reported() {
        let slots = [SlotConfig::new("a", "A")];
        let source = MockSource::new(&[("a", json!(1))]);
        let state = sample_all(&slots, &source, || 0);

        let mut display = RecordingDisplay {
            fail_on_text: true,
            ..RecordingDisplay::default()
        };
        let result = render(&state, &slots, &Layout::default(), &mut display);
        assert_eq!(result, Err(DisplayError::Communication(I2cBusError::Nack)));
        // No flush after a failed write
        assert!(!display.calls.contains(&Call::Flush));
    }

    impl DisplayOpener for CountingOpener {
        type Display = RecordingDisplay;

        fn open(&mut self, _bus: u8, _address: BusAddress) -> Result<Self::Display, DisplayError> {
            self.opens += 1;
            if self.fail_open {
                return Err(DisplayError::Open(I2cBusError::Open));
            }
            Ok(RecordingDisplay {
                fail_on_text: self.fail_on_text,
                ..RecordingDisplay::default()
            })
        }
    }

    fn counting_opener() -> CountingOpener {
        CountingOpener {
            opens: 0,
            fail_open: false,
            fail_on_text: false,
        }
    }

    #[test]
    fn test_run_cycle_renders() {
        let activation = activation(&[
            SlotConfig::new("navigation.speedOverGround", "SOG"),
            SlotConfig::new("navigation.position", "POS"),
        ]);
        let source = MockSource::new(&[
            ("navigation.speedOverGround", json!(1.23456)),
            (
                "navigation.position",
                json!({"longitude": 24.5, "latitude": 60.25}),
            ),
        ]);
        let mut opener = counting_opener();

        let outcome = run_cycle(&activation, &source, &mut opener, || 0);
        assert_eq!(outcome, CycleOutcome::Rendered { lines: 2 });
        assert!(outcome.is_rendered());
        assert_eq!(opener.opens, 1);
    }

    #[test]
    fn test_run_cycle_open_failure_swallowed() {
        let activation = activation(&[SlotConfig::new("a", "A")]);
        let source = MockSource::new(&[("a", json!(1))]);
        let mut opener = CountingOpener {
            fail_open: true,
            ..counting_opener()
        };

        let outcome = run_cycle(&activation, &source, &mut opener, || 0);
        assert_eq!(outcome, CycleOutcome::OpenFailed(DisplayError::Open(I2cBusError::Open)));

        // Next tick tries again
        opener.fail_open = false;
        let outcome = run_cycle(&activation, &source, &mut opener, || 0);
        assert!(outcome.is_rendered());
        assert_eq!(opener.opens, 2);
    }

    #[test]
    fn test_run_cycle_write_failure_swallowed() {
        let activation = activation(&[SlotConfig::new("a", "A")]);
        let source = MockSource::new(&[("a", json!(1))]);
        let mut opener = CountingOpener {
            fail_on_text: true,
            ..counting_opener()
        };

        let outcome = run_cycle(&activation, &source, &mut opener, || 0);
        assert_eq!(
            outcome,
            CycleOutcome::RenderFailed(DisplayError::Communication(I2cBusError::Nack))
        );
    }
}
