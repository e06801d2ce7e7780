use crate::error::Result;
use crate::models::{ProcessedDataset, SurveyRecord};
use crate::processors::cleaner::mean;
use crate::utils::constants::{
    DEFAULT_ZOOM, FALLBACK_CENTER, LEAFLET_CSS_URL, LEAFLET_JS_URL, OSM_ATTRIBUTION, OSM_TILE_URL,
    SATELLITE_ATTRIBUTION, SATELLITE_TILE_URL, WGS84_EPSG,
};
use crate::utils::html::escape_html;
use chrono::Local;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Leaflet bootstrap; reads everything from `MAP_DATA`.
const MAP_SCRIPT: &str = r#"
(function () {
  var data = MAP_DATA;
  var base = L.tileLayer(data.base.url, { attribution: data.base.attribution, maxZoom: 19 });
  var map = L.map('map', { center: data.center, zoom: data.zoom, layers: [base] });
  var baseLayers = { 'OpenStreetMap': base };
  if (data.satellite) {
    baseLayers['Satellite'] = L.tileLayer(data.satellite.url, {
      attribution: data.satellite.attribution,
      maxZoom: 19
    });
  }
  var overlays = {};
  data.layers.forEach(function (layer) {
    var group = L.featureGroup();
    layer.markers.forEach(function (marker) {
      L.circleMarker([marker.lat, marker.lon], {
        radius: 6,
        color: '#333333',
        weight: 1,
        fillColor: layer.color,
        fillOpacity: 0.85
      })
        .bindPopup(marker.popup, { maxWidth: 350 })
        .bindTooltip(marker.tooltip)
        .addTo(group);
    });
    group.addTo(map);
    overlays[layer.label] = group;
  });
  L.control.layers(baseLayers, overlays, { position: 'topright', collapsed: false }).addTo(map);
})();
"#;

const PANEL_STYLE: &str = "background-color: white; border: 3px solid #333; z-index: 9999; \
    font-size: 12px; border-radius: 4px; box-shadow: 0 0 8px rgba(0,0,0,0.2);";

#[derive(Serialize)]
struct TileSource {
    url: &'static str,
    attribution: &'static str,
}

#[derive(Serialize)]
struct MapPayload {
    center: [f64; 2],
    zoom: u8,
    base: TileSource,
    satellite: Option<TileSource>,
    layers: Vec<LayerPayload>,
}

#[derive(Serialize)]
struct LayerPayload {
    label: String,
    color: String,
    markers: Vec<MarkerPayload>,
}

#[derive(Serialize)]
struct MarkerPayload {
    lat: f64,
    lon: f64,
    tooltip: String,
    popup: String,
}

/// Map center over every point of every dataset, `None` without points.
pub fn map_center(datasets: &[ProcessedDataset]) -> Option<(f64, f64)> {
    let records = || datasets.iter().flat_map(|dataset| dataset.records.iter());
    let lat = mean(records().map(|record| record.latitude))?;
    let lon = mean(records().map(|record| record.longitude))?;
    Some((lat, lon))
}

/// Renders processed datasets into a self-contained Leaflet document.
pub struct MapRenderer {
    title: String,
    satellite_layer: bool,
}

impl MapRenderer {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            satellite_layer: true,
        }
    }

    pub fn with_satellite_layer(mut self, enabled: bool) -> Self {
        self.satellite_layer = enabled;
        self
    }

    /// Render and save; returns the size of the written file in bytes.
    pub fn write_map(&self, datasets: &[ProcessedDataset], path: &Path) -> Result<u64> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let html = self.render(datasets)?;
        std::fs::write(path, &html)?;

        let size = std::fs::metadata(path)?.len();
        info!("Saved map to {}", path.display());
        Ok(size)
    }

    pub fn render(&self, datasets: &[ProcessedDataset]) -> Result<String> {
        let center = map_center(datasets).unwrap_or(FALLBACK_CENTER);

        let payload = MapPayload {
            center: [center.0, center.1],
            zoom: DEFAULT_ZOOM,
            base: TileSource {
                url: OSM_TILE_URL,
                attribution: OSM_ATTRIBUTION,
            },
            satellite: self.satellite_layer.then_some(TileSource {
                url: SATELLITE_TILE_URL,
                attribution: SATELLITE_ATTRIBUTION,
            }),
            layers: datasets.iter().map(layer_payload).collect(),
        };

        // Keep "</script>" sequences in data from closing the script element
        let data = serde_json::to_string(&payload)?.replace("</", "<\\/");

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
<script src="{js}"></script>
<style>html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }} #map {{ position: absolute; top: 0; bottom: 0; right: 0; left: 0; }}</style>
</head>
<body>
<div id="map"></div>
{title_panel}
{legend_panel}
<script>
const MAP_DATA = {data};
{script}
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            css = LEAFLET_CSS_URL,
            js = LEAFLET_JS_URL,
            title_panel = self.title_panel(datasets, center),
            legend_panel = legend_panel(datasets),
            data = data,
            script = MAP_SCRIPT,
        );

        Ok(html)
    }

    fn title_panel(&self, datasets: &[ProcessedDataset], center: (f64, f64)) -> String {
        let total: usize = datasets.iter().map(ProcessedDataset::len).sum();

        let mut entries = String::new();
        for dataset in datasets {
            entries.push_str(&format!(
                "<b style=\"color: {}\">● {}</b> ({} boreholes, {})<br>",
                dataset.style.hex,
                escape_html(&dataset.name),
                dataset.len(),
                dataset.zone.zone
            ));
        }

        format!(
            r#"<div id="title-panel" style="position: fixed; top: 10px; left: 50px; width: 450px; padding: 12px; {style}">
<b style="font-size: 15px;">{title}</b><br>
<hr style="margin: 5px 0;">
{entries}<hr style="margin: 5px 0;">
<b>Total Boreholes:</b> {total}<br>
<b>Datasets:</b> {count}<br>
<b>Target CRS:</b> WGS84 (EPSG:{epsg})<br>
<b>Region:</b> {lat:.4}°N, {lon:.4}°E<br>
<i style="color: #666; font-size: 11px;">Use layer control (→) to toggle datasets · generated {generated}</i>
</div>"#,
            style = PANEL_STYLE,
            title = escape_html(&self.title),
            entries = entries,
            total = total,
            count = datasets.len(),
            epsg = WGS84_EPSG,
            lat = center.0,
            lon = center.1,
            generated = Local::now().format("%Y-%m-%d %H:%M"),
        )
    }
}

fn legend_panel(datasets: &[ProcessedDataset]) -> String {
    let mut entries = String::new();
    for dataset in datasets {
        entries.push_str(&format!(
            "<i style=\"background: {}; border-radius: 50%; display: inline-block; height: 12px; width: 12px; margin-right: 8px;\"></i> {}<br>",
            dataset.style.hex,
            escape_html(&dataset.name)
        ));
    }

    format!(
        r#"<div id="legend-panel" style="position: fixed; bottom: 50px; right: 50px; width: 240px; padding: 10px; {style}">
<b>Legend ({count} Datasets)</b><br>
<hr style="margin: 5px 0;">
{entries}<hr style="margin: 5px 0;">
<i style="font-size: 11px; color: #666;">• Hover for Bohr ID<br>• Click for details</i>
</div>"#,
        style = PANEL_STYLE,
        count = datasets.len(),
        entries = entries,
    )
}

fn layer_payload(dataset: &ProcessedDataset) -> LayerPayload {
    LayerPayload {
        label: format!("{} ({} pts)", escape_html(&dataset.name), dataset.len()),
        color: dataset.style.hex.clone(),
        markers: dataset
            .records
            .iter()
            .map(|record| MarkerPayload {
                lat: record.latitude,
                lon: record.longitude,
                tooltip: tooltip(dataset, record),
                popup: popup_html(dataset, record),
            })
            .collect(),
    }
}

fn tooltip(dataset: &ProcessedDataset, record: &SurveyRecord) -> String {
    match &record.record_id {
        Some(id) => format!("<b>{}</b> • {}", escape_html(id), escape_html(&dataset.name)),
        None => format!(
            "({:.4}, {:.4}) • {}",
            record.latitude,
            record.longitude,
            escape_html(&dataset.name)
        ),
    }
}

/// Popup table for one marker; missing attribute values are left out.
pub fn popup_html(dataset: &ProcessedDataset, record: &SurveyRecord) -> String {
    let mut popup = String::new();

    popup.push_str(&format!(
        "<b style=\"font-size: 14px; color: {};\">{}</b><br><hr style=\"margin: 5px 0;\">\
         <table style=\"border-collapse: collapse; font-size: 12px;\">",
        dataset.style.hex,
        escape_html(&dataset.name)
    ));

    if let Some(id) = &record.record_id {
        popup.push_str(&format!(
            "<tr><td><b>Bohr ID:</b></td><td><b style=\"color: #333;\">{}</b></td></tr>",
            escape_html(id)
        ));
    }

    popup.push_str(&format!(
        "<tr><td><b>Latitude:</b></td><td>{:.6}°</td></tr>\
         <tr><td><b>Longitude:</b></td><td>{:.6}°</td></tr>\
         <tr><td><b>GK X (m):</b></td><td>{:.0}</td></tr>\
         <tr><td><b>GK Y (m):</b></td><td>{:.0}</td></tr>",
        record.latitude, record.longitude, record.x, record.y
    ));

    for (name, value) in dataset.visible_attributes(record) {
        popup.push_str(&format!(
            "<tr><td><b>{}:</b></td><td>{}</td></tr>",
            escape_html(name),
            escape_html(&value.to_string())
        ));
    }

    popup.push_str(&format!(
        "</table><hr style=\"margin: 5px 0;\">\
         <i style=\"font-size: 10px; color: #666;\">{} → WGS84</i>",
        dataset.zone.zone
    ));

    popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, DatasetStyle, GkZone, ZoneConfidence, ZoneDetection};
    use std::path::PathBuf;

    fn dataset(name: &str, position: usize, records: Vec<SurveyRecord>) -> ProcessedDataset {
        ProcessedDataset {
            name: name.to_string(),
            source: PathBuf::from("points.xlsx"),
            sheet: "Geo".to_string(),
            style: DatasetStyle::from_palette(position),
            zone: ZoneDetection {
                zone: GkZone::Zone3,
                mean_x: Some(3_455_000.0),
                confidence: ZoneConfidence::Detected,
            },
            has_id_column: true,
            popup_columns: vec!["Tiefe".to_string(), "Bemerkung".to_string()],
            rows_read: records.len(),
            records,
        }
    }

    fn record(id: Option<&str>, lat: f64, lon: f64, attributes: Vec<CellValue>) -> SurveyRecord {
        SurveyRecord {
            record_id: id.map(str::to_string),
            x: 3_450_000.0,
            y: 5_800_000.0,
            latitude: lat,
            longitude: lon,
            attributes,
        }
    }

    #[test]
    fn test_center_spans_all_datasets() {
        let datasets = vec![
            dataset("A", 0, vec![record(None, 52.0, 8.0, vec![]), record(None, 52.0, 8.0, vec![])]),
            dataset("B", 1, vec![record(None, 55.0, 11.0, vec![])]),
            dataset("Empty", 2, vec![]),
        ];

        let (lat, lon) = map_center(&datasets).unwrap();
        assert!((lat - 53.0).abs() < 1e-9);
        assert!((lon - 9.0).abs() < 1e-9);
        assert_eq!(map_center(&[dataset("Empty", 0, vec![])]), None);
    }

    #[test]
    fn test_popup_omits_missing_values_and_escapes() {
        let data = dataset(
            "SVZ <Test>",
            1,
            vec![record(
                Some("B&1"),
                52.3,
                8.3,
                vec![CellValue::Number(120.0), CellValue::Empty],
            )],
        );

        let popup = popup_html(&data, &data.records[0]);

        assert!(popup.contains("SVZ &lt;Test&gt;"));
        assert!(popup.contains("B&amp;1"));
        assert!(popup.contains("<tr><td><b>Tiefe:</b></td><td>120</td></tr>"));
        assert!(!popup.contains("Bemerkung"));
        assert!(popup.contains("Latitude:</b></td><td>52.300000°"));
        assert!(popup.contains("EPSG:31467"));
        assert!(popup.contains("#FF0000"));
    }

    #[test]
    fn test_render_contains_layers_legend_and_title() {
        let datasets = vec![
            dataset("All Points", 0, vec![record(Some("B-1"), 52.3, 8.3, vec![])]),
            dataset("Empty", 1, vec![]),
        ];

        let html = MapRenderer::new("German Boreholes Map").render(&datasets).unwrap();

        assert!(html.contains("All Points (1 pts)"));
        assert!(html.contains("Empty (0 pts)"));
        assert!(html.contains("Legend (2 Datasets)"));
        assert!(html.contains("<b>Total Boreholes:</b> 1<br>"));
        assert!(html.contains("World_Imagery"));
        assert!(html.contains("leaflet.js"));
        // title, legend, layer and popup share the one palette color per dataset
        assert_eq!(html.matches("#0066CC").count(), 4);
    }

    #[test]
    fn test_render_without_points_uses_fallback_center() {
        let html = MapRenderer::new("Empty map")
            .with_satellite_layer(false)
            .render(&[dataset("Empty", 0, vec![])])
            .unwrap();

        assert!(html.contains("\"center\":[51.1657,10.4515]"));
        assert!(html.contains("\"satellite\":null"));
        assert!(!html.contains("World_Imagery"));
    }

    #[test]
    fn test_script_close_tags_are_neutralised() {
        let data = dataset(
            "x",
            0,
            vec![record(None, 52.3, 8.3, vec![CellValue::Text("</script>".to_string()), CellValue::Empty])],
        );
        let html = MapRenderer::new("t").render(&[data]).unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
    }
}
