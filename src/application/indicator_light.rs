// Output port for the physical traffic light
use crate::domain::indicator::{OFF, Rgb};

pub trait IndicatorLight: Send + Sync {
    fn set_color(&self, color: Rgb) -> anyhow::Result<()>;

    fn clear(&self) -> anyhow::Result<()> {
        self.set_color(OFF)
    }
}
