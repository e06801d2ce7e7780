use crate::error::{ProcessingError, Result};
use crate::models::{GkZone, SurveyRecord};
use crate::utils::constants::WGS84_DEFINITION;
use proj4rs::transform::transform;
use proj4rs::Proj;

/// Gauß-Krüger to WGS84 transformer for one zone.
pub struct Reprojector {
    source: Proj,
    target: Proj,
}

impl Reprojector {
    pub fn for_zone(zone: GkZone) -> Result<Self> {
        Self::from_definition(&zone.proj_definition())
    }

    /// Build from an arbitrary projected proj4 definition (meters) to WGS84.
    pub fn from_definition(definition: &str) -> Result<Self> {
        let source = Proj::from_proj_string(definition).map_err(|e| {
            ProcessingError::Projection(format!("Invalid source definition '{}': {:?}", definition, e))
        })?;
        let target = Proj::from_proj_string(WGS84_DEFINITION).map_err(|e| {
            ProcessingError::Projection(format!("Invalid WGS84 definition: {:?}", e))
        })?;

        Ok(Self { source, target })
    }

    /// Transform one easting/northing pair to (longitude, latitude) in degrees.
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let mut point = (x, y, 0.0);
        transform(&self.source, &self.target, &mut point).map_err(|e| {
            ProcessingError::Projection(format!("Cannot transform ({}, {}): {:?}", x, y, e))
        })?;

        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProcessingError::Projection(format!(
                "Transform of ({}, {}) produced a non-finite result",
                x, y
            )));
        }

        Ok((lon, lat))
    }

    /// Fill latitude/longitude of every record, all or nothing.
    pub fn reproject_records(&self, records: &mut [SurveyRecord]) -> Result<()> {
        let transformed = records
            .iter()
            .map(|record| self.to_wgs84(record.x, record.y))
            .collect::<Result<Vec<_>>>()?;

        for (record, (lon, lat)) in records.iter_mut().zip(transformed) {
            record.longitude = lon;
            record.latitude = lat;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian_without_datum_shift() {
        let reprojector = Reprojector::from_definition(
            "+proj=tmerc +lat_0=0 +lon_0=9 +k=1 +x_0=3500000 +y_0=0 +ellps=bessel +units=m +no_defs",
        )
        .unwrap();

        let (lon, lat) = reprojector.to_wgs84(3_500_000.0, 5_800_000.0).unwrap();
        assert!((lon - 9.0).abs() < 1e-6, "longitude was {}", lon);
        assert!(lat > 52.0 && lat < 52.7, "latitude was {}", lat);
    }

    #[test]
    fn test_central_meridians_with_datum_shift() {
        for zone in [GkZone::Zone2, GkZone::Zone3, GkZone::Zone4] {
            let reprojector = Reprojector::for_zone(zone).unwrap();
            let (lon, _) = reprojector
                .to_wgs84(zone.false_easting(), 5_600_000.0)
                .unwrap();

            assert!(
                (lon - zone.central_meridian()).abs() < 5e-3,
                "zone {} longitude was {}",
                zone.number(),
                lon
            );
        }
    }

    #[test]
    fn test_zone_3_scenario() {
        let reprojector = Reprojector::for_zone(GkZone::Zone3).unwrap();
        let (lon_a, lat_a) = reprojector.to_wgs84(3_450_000.0, 5_800_000.0).unwrap();
        let (lon_b, lat_b) = reprojector.to_wgs84(3_460_000.0, 5_801_000.0).unwrap();

        // 40-50 km west of the 9° meridian at ~52.3° N
        assert!(lon_a > 8.0 && lon_a < 9.0, "longitude was {}", lon_a);
        assert!(lon_b > lon_a && lon_b < 9.0);
        assert!(lat_a > 52.0 && lat_a < 52.7, "latitude was {}", lat_a);
        assert!(lat_b > lat_a);
    }

    #[test]
    fn test_reprojection_preserves_order() {
        let reprojector = Reprojector::for_zone(GkZone::Zone3).unwrap();
        let mut records = vec![
            SurveyRecord::projected(Some("east".to_string()), 3_520_000.0, 5_600_000.0, vec![]),
            SurveyRecord::projected(Some("west".to_string()), 3_480_000.0, 5_600_000.0, vec![]),
        ];

        reprojector.reproject_records(&mut records).unwrap();

        assert!(records[0].longitude > 9.0);
        assert!(records[1].longitude < 9.0);
        assert!(records.iter().all(|r| r.latitude.is_finite()));
    }

    #[test]
    fn test_failed_record_fails_whole_batch() {
        let reprojector = Reprojector::for_zone(GkZone::Zone3).unwrap();
        let mut records = vec![
            SurveyRecord::projected(Some("good".to_string()), 3_450_000.0, 5_800_000.0, vec![]),
            SurveyRecord::projected(Some("bad".to_string()), 1.0e9, 5_800_000.0, vec![]),
        ];

        let result = reprojector.reproject_records(&mut records);

        assert!(matches!(result, Err(ProcessingError::Projection(_))));
        // no partial output
        assert!(records[0].latitude.is_nan());
        assert!(records[0].longitude.is_nan());
    }

    #[test]
    fn test_unreachable_easting_is_projection_error() {
        let reprojector = Reprojector::for_zone(GkZone::Zone3).unwrap();
        let result = reprojector.to_wgs84(1.0e9, 5_800_000.0);
        assert!(matches!(result, Err(ProcessingError::Projection(_))));
    }
}
