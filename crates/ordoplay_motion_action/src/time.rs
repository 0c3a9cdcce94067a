// SPDX-License-Identifier: MIT OR Apache-2.0
//! Internal time unit and conversion at the API boundary.

/// The single internal time unit. All timing fields (start, duration, delay,
/// interval) are stored in ticks; conversion from seconds happens once, at
/// the public API boundary.
pub type Ticks = f64;

/// Conversion between human-facing seconds and internal ticks.
///
/// Constructed once and passed by value into the driver and the builders;
/// read-only thereafter. There is no global scale constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    /// How many internal ticks one second maps to.
    pub units_per_second: f64,
}

impl TimeBase {
    /// Millisecond ticks, the conventional scale.
    pub const MILLIS: TimeBase = TimeBase {
        units_per_second: 1000.0,
    };

    /// Create a time base with an explicit scale.
    pub fn new(units_per_second: f64) -> Self {
        Self { units_per_second }
    }

    /// Convert seconds to internal ticks.
    pub fn ticks(&self, seconds: f64) -> Ticks {
        seconds * self.units_per_second
    }

    /// Convert internal ticks back to seconds.
    pub fn seconds(&self, ticks: Ticks) -> f64 {
        ticks / self.units_per_second
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::MILLIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_trip() {
        let tb = TimeBase::default();
        assert_eq!(tb.ticks(1.5), 1500.0);
        assert_eq!(tb.seconds(tb.ticks(0.25)), 0.25);
    }

    #[test]
    fn test_custom_scale() {
        let tb = TimeBase::new(60.0);
        assert_eq!(tb.ticks(2.0), 120.0);
    }
}
