use crate::models::{GkZone, ZoneConfidence, ZoneDetection};
use crate::utils::constants::{
    ZONE_2_MIN_EASTING, ZONE_3_MIN_EASTING, ZONE_4_MAX_EASTING, ZONE_4_MIN_EASTING,
};

/// Zone applied when the mean easting gives no answer
pub const DEFAULT_ZONE: GkZone = GkZone::Zone3;

/// Classify a dataset from the mean of its eastings.
///
/// Ranges are half-open and checked in the order zone 3, zone 4, zone 2.
/// Anything else, including an undefined mean, falls back to zone 3.
pub fn detect_zone(mean_x: Option<f64>) -> ZoneDetection {
    let detected = mean_x.and_then(|mean| {
        if (ZONE_3_MIN_EASTING..ZONE_4_MIN_EASTING).contains(&mean) {
            Some(GkZone::Zone3)
        } else if (ZONE_4_MIN_EASTING..ZONE_4_MAX_EASTING).contains(&mean) {
            Some(GkZone::Zone4)
        } else if (ZONE_2_MIN_EASTING..ZONE_3_MIN_EASTING).contains(&mean) {
            Some(GkZone::Zone2)
        } else {
            None
        }
    });

    match detected {
        Some(zone) => ZoneDetection {
            zone,
            mean_x,
            confidence: ZoneConfidence::Detected,
        },
        None => ZoneDetection {
            zone: DEFAULT_ZONE,
            mean_x,
            confidence: ZoneConfidence::Fallback,
        },
    }
}
