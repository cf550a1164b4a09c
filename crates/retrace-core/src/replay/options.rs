//! Replay options

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::{RetraceError, RetraceResult};
use crate::timeline::{Tick, Value};

/// Replace a variable's value when replay reaches a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOverride {
    pub tick: Tick,
    pub variable_name: String,
    pub new_value: Value,
}

impl VariableOverride {
    pub fn new(tick: Tick, variable_name: impl Into<String>, new_value: impl Into<Value>) -> Self {
        Self {
            tick,
            variable_name: variable_name.into(),
            new_value: new_value.into(),
        }
    }
}

/// How a replay runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    /// Playback speed multiplier; the per-tick delay is `base_unit / speed`
    pub speed: f64,
    /// Ticks that emit a breakpoint event
    pub breakpoints: BTreeSet<Tick>,
    /// Variable names reported on every tick where they exist
    pub watch_expressions: Vec<String>,
    /// Overrides applied when their tick is replayed
    pub modify_variables: Vec<VariableOverride>,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            breakpoints: BTreeSet::new(),
            watch_expressions: Vec::new(),
            modify_variables: Vec::new(),
        }
    }
}

impl ReplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the playback speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Add a breakpoint
    pub fn with_breakpoint(mut self, tick: Tick) -> Self {
        self.breakpoints.insert(tick);
        self
    }

    /// Watch a variable by name
    pub fn with_watch(mut self, name: impl Into<String>) -> Self {
        self.watch_expressions.push(name.into());
        self
    }

    /// Override a variable at a tick
    pub fn with_override(
        mut self,
        tick: Tick,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.modify_variables
            .push(VariableOverride::new(tick, name, value));
        self
    }

    /// Reject speeds that cannot produce a delay
    pub fn validate(&self) -> RetraceResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(RetraceError::invalid_input_field(
                format!("replay speed must be a positive number, got {}", self.speed),
                "speed",
            ));
        }
        Ok(())
    }

    /// Delay between ticks for a given base unit
    pub fn tick_delay(&self, base_unit: Duration) -> Duration {
        Duration::try_from_secs_f64(base_unit.as_secs_f64() / self.speed).unwrap_or(Duration::MAX)
    }

    pub(super) fn overrides_at(&self, tick: Tick) -> impl Iterator<Item = &VariableOverride> {
        self.modify_variables.iter().filter(move |o| o.tick == tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_validation() {
        assert!(ReplayOptions::new().validate().is_ok());
        assert!(ReplayOptions::new().with_speed(0.25).validate().is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ReplayOptions::new().with_speed(bad).validate().unwrap_err();
            assert!(matches!(err, RetraceError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_tick_delay_scales_with_speed() {
        let base = Duration::from_millis(100);
        let delay = |speed: f64| ReplayOptions::new().with_speed(speed).tick_delay(base);

        assert_eq!(delay(1.0), base);
        assert!((delay(2.0).as_secs_f64() - 0.05).abs() < 1e-6);
        assert!((delay(0.5).as_secs_f64() - 0.2).abs() < 1e-6);
        assert_eq!(delay(f64::MIN_POSITIVE), Duration::MAX);
    }

    #[test]
    fn test_options_from_json_defaults() {
        let options: ReplayOptions =
            serde_json::from_str(r#"{"breakpoints": [3, 1], "watch_expressions": ["x"]}"#)
                .unwrap();
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.breakpoints.into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(options.watch_expressions, vec!["x".to_string()]);
    }

    #[test]
    fn test_overrides_at_tick() {
        let options = ReplayOptions::new()
            .with_override(2, "x", 1)
            .with_override(3, "y", 2)
            .with_override(2, "z", 3);
        let names: Vec<_> = options
            .overrides_at(2)
            .map(|o| o.variable_name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "z"]);
    }
}
