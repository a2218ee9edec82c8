// Indicator light that reports PWM duty cycles through tracing
use crate::application::indicator_light::IndicatorLight;
use crate::domain::indicator::Rgb;
use crate::infrastructure::config::IndicatorConfig;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycles {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Clamp a channel into 0..=255 before it becomes a duty cycle.
pub fn ensure_valid_brightness(brightness: f64) -> u8 {
    if brightness.is_nan() {
        return 0;
    }
    brightness.clamp(0.0, 255.0) as u8
}

impl From<Rgb> for DutyCycles {
    fn from(color: Rgb) -> Self {
        Self {
            red: ensure_valid_brightness(color.red),
            green: ensure_valid_brightness(color.green),
            blue: ensure_valid_brightness(color.blue),
        }
    }
}

pub struct LogLight {
    pins: IndicatorConfig,
    last: Mutex<Option<DutyCycles>>,
}

impl LogLight {
    pub fn new(pins: IndicatorConfig) -> Self {
        Self {
            pins,
            last: Mutex::new(None),
        }
    }

    pub fn duty_cycles(&self) -> Option<DutyCycles> {
        self.last.lock().ok().and_then(|last| *last)
    }
}

impl IndicatorLight for LogLight {
    fn set_color(&self, color: Rgb) -> anyhow::Result<()> {
        let duty = DutyCycles::from(color);
        tracing::info!(
            "Indicator duty cycles: pin {}={} pin {}={} pin {}={}",
            self.pins.pin_red,
            duty.red,
            self.pins.pin_green,
            duty.green,
            self.pins.pin_blue,
            duty.blue
        );

        let mut last = self
            .last
            .lock()
            .map_err(|_| anyhow::anyhow!("indicator state lock poisoned"))?;
        *last = Some(duty);
        Ok(())
    }
}
