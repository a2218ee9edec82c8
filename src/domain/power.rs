// Power mix domain model and the estimation curves feeding it
//
// All curves are empirical fits: onshore and offshore wind against windpark
// yield data, solar against monthly PV yield in Germany. The constants are the
// contract and must not be re-derived, apart from the monthly solar factors
// noted below.
use super::mapping::{force_non_negative, map_value, map_value_clamp};
use chrono::{Datelike, Local, NaiveDateTime, NaiveTime, Timelike};
use std::f64::consts::PI;
use thiserror::Error;

pub const DEFAULT_DEMAND_AVERAGE: f64 = 60.0;
pub const DEFAULT_DEMAND_DEVIATION: f64 = 20.0;

/// Peak solar output in GW before the monthly and cloud factors apply.
pub const SOLAR_CONSTANT: f64 = 7.0;

/// Relative solar yield per calendar month, January first. Only January
/// (1.086) and December (1.0) are fixed; February to November approximate
/// the German monthly PV yield shape.
pub const MONTHLY_SOLAR_FACTORS: [f64; 12] = [
    1.086, 1.943, 3.229, 4.571, 5.286, 5.4, 5.371, 4.743, 3.514, 2.257, 1.2, 1.0,
];

#[derive(Debug, Error, PartialEq)]
pub enum PowerError {
    #[error("cannot distribute a power mix with a total of {0} GW")]
    ZeroTotal(f64),
}

/// Absolute power by source plus demand, in GW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerMix {
    pub onshore: f64,
    pub offshore: f64,
    pub solar: f64,
    pub conventional: f64,
    pub total: f64,
}

impl PowerMix {
    /// `total` is the estimated demand; conventional covers whatever the
    /// renewables leave open.
    pub fn from_sources(onshore: f64, offshore: f64, solar: f64, total: f64) -> Self {
        let conventional = force_non_negative(total - (onshore + offshore + solar));
        Self {
            onshore,
            offshore,
            solar,
            conventional,
            total,
        }
    }
}

/// Power mix as fractions of total demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerDistribution {
    pub onshore: f64,
    pub offshore: f64,
    pub solar: f64,
    pub conventional: f64,
}

impl PowerDistribution {
    pub fn sum(&self) -> f64 {
        self.onshore + self.offshore + self.solar + self.conventional
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandParams {
    pub average: f64,
    pub deviation: f64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            average: DEFAULT_DEMAND_AVERAGE,
            deviation: DEFAULT_DEMAND_DEVIATION,
        }
    }
}

fn hour_fraction(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// Daily sine phase: -1 at midnight, 0 at 6:00 and 18:00, 1 at noon.
fn diurnal_phase(time: NaiveTime) -> f64 {
    (2.0 * PI / 24.0 * (hour_fraction(time) - 6.0)).sin()
}

pub fn estimate_demand(time: NaiveTime, average: f64, deviation: f64) -> f64 {
    deviation / 2.0 * diurnal_phase(time) + average
}

pub fn estimate_onshore_wind_power(wind_speed: f64) -> f64 {
    force_non_negative(-(-0.53 * (wind_speed - 10.0)).exp() + 32.0)
}

pub fn estimate_offshore_wind_power(wind_speed: f64) -> f64 {
    // The two fits overlap between 9.5 and 9.89 m/s; the switch at 10 is intended.
    let power = if wind_speed < 10.0 {
        map_value(wind_speed, 4.65, 9.5, 0.732, 5.465)
    } else {
        map_value(wind_speed, 9.89, 15.16, 5.465, 4.8)
    };
    force_non_negative(power)
}

pub fn estimate_solar_power(date: NaiveDateTime, cloudiness: f64) -> f64 {
    let factor = MONTHLY_SOLAR_FACTORS[date.month0() as usize];
    let cloud_factor = map_value_clamp(1.0 - cloudiness / 100.0 + 0.6, 0.0, 1.0, 0.0, 1.0);
    factor * cloud_factor * SOLAR_CONSTANT * force_non_negative(diurnal_phase(date.time()))
}

pub fn estimate_power_at(
    when: NaiveDateTime,
    wind_onshore: f64,
    wind_offshore: f64,
    cloudiness: f64,
    demand: DemandParams,
) -> PowerMix {
    let total = estimate_demand(when.time(), demand.average, demand.deviation);
    PowerMix::from_sources(
        estimate_onshore_wind_power(wind_onshore),
        estimate_offshore_wind_power(wind_offshore),
        estimate_solar_power(when, cloudiness),
        total,
    )
}

/// Estimates the current mix with the default demand curve.
pub fn estimate_power(wind_onshore: f64, wind_offshore: f64, cloudiness: f64) -> PowerMix {
    estimate_power_at(
        Local::now().naive_local(),
        wind_onshore,
        wind_offshore,
        cloudiness,
        DemandParams::default(),
    )
}

pub fn estimate_distribution(mix: &PowerMix) -> Result<PowerDistribution, PowerError> {
    if mix.total == 0.0 || !mix.total.is_finite() {
        return Err(PowerError::ZeroTotal(mix.total));
    }

    Ok(PowerDistribution {
        onshore: mix.onshore / mix.total,
        offshore: mix.offshore / mix.total,
        solar: mix.solar / mix.total,
        conventional: mix.conventional / mix.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, month, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_estimate_demand() {
        assert!((estimate_demand(hm(12, 0), 60.0, 20.0) - 70.0).abs() < 1e-9);
        assert!((estimate_demand(hm(0, 0), 60.0, 20.0) - 50.0).abs() < 1e-9);
        assert!((estimate_demand(hm(6, 0), 60.0, 20.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_demand_uses_minutes() {
        let half_past = estimate_demand(hm(9, 30), 60.0, 20.0);
        let expected = 10.0 * (2.0 * PI / 24.0 * 3.5).sin() + 60.0;
        assert!((half_past - expected).abs() < 1e-9);
    }

    #[test]
    fn test_onshore_is_non_negative_and_saturates() {
        for i in 0..400 {
            assert!(estimate_onshore_wind_power(i as f64 * 0.1) >= 0.0);
        }
        assert_eq!(estimate_onshore_wind_power(0.0), 0.0);
        assert!((estimate_onshore_wind_power(10.0) - 31.0).abs() < 1e-9);
        assert!((estimate_onshore_wind_power(60.0) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_offshore_segments() {
        assert!((estimate_offshore_wind_power(4.65) - 0.732).abs() < 1e-9);
        assert!((estimate_offshore_wind_power(9.5) - 5.465).abs() < 1e-9);
        assert!((estimate_offshore_wind_power(15.16) - 4.8).abs() < 1e-9);
        // Below the first fit's range the line drops under zero
        assert_eq!(estimate_offshore_wind_power(0.0), 0.0);
    }

    #[test]
    fn test_offshore_keeps_discontinuity_at_ten() {
        let below = estimate_offshore_wind_power(9.999);
        let at_ten = estimate_offshore_wind_power(10.0);
        let expected_at_ten = map_value(10.0, 9.89, 15.16, 5.465, 4.8);
        assert!((at_ten - expected_at_ten).abs() < 1e-12);
        assert!(below > at_ten);
    }

    #[test]
    fn test_solar_is_zero_at_night() {
        assert_eq!(estimate_solar_power(at(6, 0, 0), 0.0), 0.0);
        assert_eq!(estimate_solar_power(at(6, 3, 30), 0.0), 0.0);
        assert_eq!(estimate_solar_power(at(6, 21, 0), 0.0), 0.0);
    }

    #[test]
    fn test_solar_noon_uses_monthly_factor() {
        // Up to 40 % clouds still count as clear sky
        let january = estimate_solar_power(at(1, 12, 0), 40.0);
        assert!((january - 1.086 * SOLAR_CONSTANT).abs() < 1e-9);

        let december = estimate_solar_power(at(12, 12, 0), 0.0);
        assert!((december - SOLAR_CONSTANT).abs() < 1e-9);
    }

    #[test]
    fn test_solar_cloud_factor() {
        let overcast = estimate_solar_power(at(12, 12, 0), 100.0);
        assert!((overcast - 0.6 * SOLAR_CONSTANT).abs() < 1e-9);

        let partly = estimate_solar_power(at(12, 12, 0), 80.0);
        assert!((partly - 0.8 * SOLAR_CONSTANT).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_power_at_composes_mix() {
        let when = at(1, 0, 0);
        let mix = estimate_power_at(when, 10.0, 9.5, 50.0, DemandParams::default());

        assert!((mix.total - 50.0).abs() < 1e-9);
        assert!((mix.onshore - 31.0).abs() < 1e-9);
        assert!((mix.offshore - 5.465).abs() < 1e-9);
        assert_eq!(mix.solar, 0.0);
        assert!((mix.conventional - (50.0 - 31.0 - 5.465)).abs() < 1e-9);
    }

    #[test]
    fn test_conventional_never_negative() {
        let mix = PowerMix::from_sources(40.0, 5.0, 30.0, 50.0);
        assert_eq!(mix.conventional, 0.0);
        assert_eq!(mix.total, 50.0);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let mixes = [
            PowerMix::from_sources(10.0, 3.0, 5.0, 60.0),
            PowerMix::from_sources(0.0, 0.0, 0.0, 50.0),
            PowerMix::from_sources(31.0, 5.4, 13.6, 50.0),
            estimate_power_at(at(3, 14, 20), 6.0, 8.0, 70.0, DemandParams::default()),
        ];
        for mix in mixes {
            let distribution = estimate_distribution(&mix).unwrap();
            assert!((distribution.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distribution_rejects_zero_total() {
        let mix = PowerMix::from_sources(1.0, 1.0, 1.0, 0.0);
        assert_eq!(estimate_distribution(&mix), Err(PowerError::ZeroTotal(0.0)));

        let params = DemandParams {
            average: 0.0,
            deviation: 0.0,
        };
        let mix = estimate_power_at(at(5, 12, 0), 0.0, 0.0, 100.0, params);
        assert!(estimate_distribution(&mix).is_err());
    }
}
