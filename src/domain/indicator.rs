// Traffic light indicator domain model
use super::mapping::map_value_clamp;
use thiserror::Error;

pub const GREEN: Rgb = Rgb::new(0.0, 255.0, 0.0);
pub const RED: Rgb = Rgb::new(255.0, 0.0, 0.0);
pub const OFF: Rgb = Rgb::new(0.0, 0.0, 0.0);

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("indicator value {0} is outside [0, 1]")]
    OutOfRange(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    pub fn lerp(self, other: Rgb, amount: f64) -> Rgb {
        let lerp = |a: f64, b: f64| a * (1.0 - amount) + b * amount;
        Rgb::new(
            lerp(self.red, other.red),
            lerp(self.green, other.green),
            lerp(self.blue, other.blue),
        )
    }
}

/// 0 is the cleanest (green) grid, 1 the dirtiest (red).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct IndicatorValue(f64);

impl IndicatorValue {
    pub fn new(value: f64) -> Result<Self, IndicatorError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(IndicatorError::OutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Maps an emission figure onto the indicator scale, clamped at both ends.
pub fn indicator_value_for(g_co2_per_kwh: f64, low: f64, high: f64) -> Result<IndicatorValue, IndicatorError> {
    IndicatorValue::new(map_value_clamp(g_co2_per_kwh, low, high, 0.0, 1.0))
}

/// Per-channel linear blend from green at 0 to red at 1.
pub fn indicator_color(amount: f64) -> Result<Rgb, IndicatorError> {
    let value = IndicatorValue::new(amount)?;
    Ok(GREEN.lerp(RED, value.value()))
}
