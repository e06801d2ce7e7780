use crate::utils::constants::DHDN_TOWGS84;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gauß-Krüger (DHDN) zones supported by the reprojector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GkZone {
    Zone2,
    Zone3,
    Zone4,
}

impl GkZone {
    pub fn number(self) -> u8 {
        match self {
            GkZone::Zone2 => 2,
            GkZone::Zone3 => 3,
            GkZone::Zone4 => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            2 => Some(GkZone::Zone2),
            3 => Some(GkZone::Zone3),
            4 => Some(GkZone::Zone4),
            _ => None,
        }
    }

    pub fn epsg(self) -> u32 {
        match self {
            GkZone::Zone2 => 31466,
            GkZone::Zone3 => 31467,
            GkZone::Zone4 => 31468,
        }
    }

    /// Central meridian in degrees east
    pub fn central_meridian(self) -> f64 {
        3.0 * f64::from(self.number())
    }

    /// False easting in meters; the leading digit is the zone number
    pub fn false_easting(self) -> f64 {
        f64::from(self.number()) * 1_000_000.0 + 500_000.0
    }

    /// proj4 definition of the zone including the DHDN datum shift
    pub fn proj_definition(self) -> String {
        format!(
            "+proj=tmerc +lat_0=0 +lon_0={} +k=1 +x_0={} +y_0=0 +ellps=bessel +towgs84={} +units=m +no_defs",
            self.central_meridian(),
            self.false_easting(),
            DHDN_TOWGS84
        )
    }
}

impl fmt::Display for GkZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gauß-Krüger Zone {} ({}° meridian, EPSG:{})",
            self.number(),
            self.central_meridian(),
            self.epsg()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZoneConfidence {
    /// Mean easting fell inside a zone's range
    Detected,
    /// Mean easting was out of range or undefined; default zone applied
    Fallback,
}

/// Outcome of classifying one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDetection {
    pub zone: GkZone,
    pub mean_x: Option<f64>,
    pub confidence: ZoneConfidence,
}

impl ZoneDetection {
    pub fn is_fallback(&self) -> bool {
        self.confidence == ZoneConfidence::Fallback
    }
}
