// Precise mode: wind speed averaged over the largest German windparks
//
// Onshore parks from Wikipedia's list of the largest German onshore windparks,
// offshore parks in the North and Baltic Sea. Capacities in MW.
use super::mapping::{force_non_negative, map_value};
use super::weather::Coordinate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindPark {
    pub coordinate: Coordinate,
    pub capacity_mw: f64,
}

impl WindPark {
    pub const fn new(lat: f64, lon: f64, capacity_mw: f64) -> Self {
        Self {
            coordinate: Coordinate::new(lat, lon),
            capacity_mw,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WindParkError {
    #[error("no wind speed samples to average")]
    NoSamples,
}

/// Mean wind speed where each park is weighted by its share of the average
/// park capacity.
pub fn weighted_average_wind_speed(samples: &[(WindPark, f64)]) -> Result<f64, WindParkError> {
    if samples.is_empty() {
        return Err(WindParkError::NoSamples);
    }

    let count = samples.len() as f64;
    let average_capacity = samples.iter().map(|(park, _)| park.capacity_mw).sum::<f64>() / count;
    let weighted_sum: f64 = samples
        .iter()
        .map(|(park, speed)| speed * park.capacity_mw / average_capacity)
        .sum();

    Ok(weighted_sum / count)
}

pub fn estimate_onshore_wind_power_precise(average_weighted_wind_speed: f64) -> f64 {
    force_non_negative(map_value(average_weighted_wind_speed, 3.0, 10.0, 7.3, 35.0))
}

pub fn estimate_offshore_wind_power_precise(average_weighted_wind_speed: f64) -> f64 {
    force_non_negative(map_value(average_weighted_wind_speed, 1.92, 5.71, 2.65, 4.05))
}

pub const ONSHORE_WINDPARKS: [WindPark; 74] = [
    WindPark::new(48.4424, 9.5323, 52.25),
    WindPark::new(48.5851, 11.069, 52.8),
    WindPark::new(49.1746, 9.2456, 54.9),
    WindPark::new(49.4121, 8.0625, 61.0),
    WindPark::new(49.4316, 7.4319, 52.2),
    WindPark::new(49.4551, 8.0335, 48.8),
    WindPark::new(49.4848, 8.014, 43.2),
    WindPark::new(49.4948, 8.0819, 55.0),
    WindPark::new(49.5753, 7.399, 70.5),
    WindPark::new(50.0012, 7.2312, 59.8),
    WindPark::new(50.311, 6.2225, 49.65),
    WindPark::new(50.3611, 9.1438, 49.8),
    WindPark::new(50.3725, 9.0912, 41.8),
    WindPark::new(51.0154, 10.3747, 152.25),
    WindPark::new(51.0226, 11.3713, 59.1),
    WindPark::new(51.0228, 6.3148, 67.2),
    WindPark::new(51.0422, 11.4722, 58.0),
    WindPark::new(51.0754, 11.5751, 188.1),
    WindPark::new(51.1023, 11.212, 82.65),
    WindPark::new(51.1451, 10.172, 58.1),
    WindPark::new(51.2344, 11.4233, 122.1),
    WindPark::new(51.2447, 11.3514, 41.6),
    WindPark::new(51.2522, 11.504, 42.4),
    WindPark::new(51.2643, 8.4149, 65.95),
    WindPark::new(51.2827, 13.1459, 82.8),
    WindPark::new(51.3247, 13.527, 93.1),
    WindPark::new(51.3447, 11.4231, 89.3),
    WindPark::new(51.372, 8.4812, 75.05),
    WindPark::new(51.3825, 8.5444, 129.445),
    WindPark::new(51.3833, 11.393, 72.0),
    WindPark::new(51.4228, 12.1421, 62.7),
    WindPark::new(51.4316, 11.3839, 83.35),
    WindPark::new(51.4628, 12.423, 77.1),
    WindPark::new(51.4755, 11.2931, 83.05),
    WindPark::new(51.5018, 12.5231, 46.0),
    WindPark::new(51.5646, 14.2746, 64.0),
    WindPark::new(51.5739, 11.3623, 114.45),
    WindPark::new(51.5833, 11.277, 79.1),
    WindPark::new(51.5923, 10.5, 92.4),
    WindPark::new(52.005, 12.4951, 128.2),
    WindPark::new(52.0056, 13.1136, 98.8),
    WindPark::new(52.008, 12.0723, 44.9),
    WindPark::new(52.014, 11.224, 76.9),
    WindPark::new(52.0336, 14.2255, 43.2),
    WindPark::new(52.0724, 11.936, 87.65),
    WindPark::new(52.1035, 11.18, 64.1),
    WindPark::new(52.1042, 11.531, 44.4),
    WindPark::new(52.1133, 11.225, 71.3),
    WindPark::new(52.3057, 11.4651, 151.3),
    WindPark::new(52.3223, 12.5218, 175.2),
    WindPark::new(52.355, 12.16, 40.4),
    WindPark::new(52.3946, 11.4233, 93.5),
    WindPark::new(52.523, 7.082, 70.1),
    WindPark::new(52.5241, 10.0234, 40.9),
    WindPark::new(52.54, 12.233, 40.5),
    WindPark::new(52.5836, 7.2457, 41.0),
    WindPark::new(53.0415, 7.4421, 86.5),
    WindPark::new(53.1915, 12.0137, 75.2),
    WindPark::new(53.2015, 7.0545, 106.25),
    WindPark::new(53.2018, 13.4552, 242.5),
    WindPark::new(53.2147, 7.4218, 77.4),
    WindPark::new(53.2224, 9.2949, 52.9),
    WindPark::new(53.2317, 7.224, 102.34),
    WindPark::new(53.2348, 14.109, 47.1),
    WindPark::new(53.322, 8.571, 49.45),
    WindPark::new(53.3625, 8.4735, 43.6),
    WindPark::new(53.3637, 7.2545, 318.2),
    WindPark::new(53.413, 8.3846, 46.3),
    WindPark::new(53.4255, 13.1911, 202.85),
    WindPark::new(53.494, 8.0444, 65.6),
    WindPark::new(53.5826, 8.56, 302.45),
    WindPark::new(54.29, 11.0636, 57.5),
    WindPark::new(54.364, 8.5413, 293.4),
    WindPark::new(54.3855, 9.1035, 42.0),
];

pub const OFFSHORE_WINDPARKS: [WindPark; 27] = [
    WindPark::new(53.4124, 6.2848, 113.4),
    WindPark::new(53.5, 8.1, 110.7),
    WindPark::new(53.5721, 6.2945, 464.8),
    WindPark::new(53.58, 6.33, 312.0),
    WindPark::new(53.58, 6.48, 332.1),
    WindPark::new(54.003, 6.3554, 60.48),
    WindPark::new(54.1818, 5.4756, 260.4),
    WindPark::new(54.1901, 5.5215, 402.0),
    WindPark::new(54.2, 6.33, 396.0),
    WindPark::new(54.213, 5.583, 400.0),
    WindPark::new(54.23, 7.41, 288.0),
    WindPark::new(54.246, 6.2725, 200.0),
    WindPark::new(54.26, 6.19, 497.0),
    WindPark::new(54.26, 7.41, 295.2),
    WindPark::new(54.3, 6.213, 400.0),
    WindPark::new(54.3, 6.24, 112.0),
    WindPark::new(54.3, 6.2758, 203.2),
    WindPark::new(54.3, 7.01, 264.0),
    WindPark::new(54.3, 7.48, 302.4),
    WindPark::new(54.3632, 12.3904, 48.3),
    WindPark::new(54.4, 7.02, 346.0),
    WindPark::new(54.4655, 14.0716, 384.0),
    WindPark::new(54.5002, 14.0405, 353.5),
    WindPark::new(54.54, 7.45, 288.0),
    WindPark::new(54.5855, 13.0943, 288.0),
    WindPark::new(55.11, 6.51, 288.0),
    WindPark::new(55.9, 7.103, 302.4),
];
