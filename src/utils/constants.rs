/// Zone detection thresholds on the mean easting (meters)
pub const ZONE_2_MIN_EASTING: f64 = 1_500_000.0;
pub const ZONE_3_MIN_EASTING: f64 = 2_500_000.0;
pub const ZONE_4_MIN_EASTING: f64 = 3_500_000.0;
pub const ZONE_4_MAX_EASTING: f64 = 4_500_000.0;

/// DHDN to WGS84 seven-parameter Helmert shift shared by all GK zones
pub const DHDN_TOWGS84: &str = "598.1,73.7,418.2,0.202,0.045,-2.455,6.7";

/// Target reference system
pub const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";
pub const WGS84_EPSG: u32 = 4326;

/// Columns produced by the pipeline; never shown as popup attributes
pub const RESERVED_COLUMNS: [&str; 5] = ["X", "Y", "latitude", "longitude", "bohr_id"];

/// Legend/marker palette cycled by dataset position
pub const DEFAULT_PALETTE: [&str; 4] = ["#0066CC", "#FF0000", "#00AA00", "#9933FF"];

/// Named marker colors accepted in dataset descriptors
pub const NAMED_COLORS: [(&str, &str); 11] = [
    ("blue", "#0066CC"),
    ("red", "#FF0000"),
    ("green", "#00AA00"),
    ("purple", "#9933FF"),
    ("orange", "#FF8C00"),
    ("darkblue", "#00008B"),
    ("darkred", "#8B0000"),
    ("darkgreen", "#006400"),
    ("cadetblue", "#5F9EA0"),
    ("black", "#000000"),
    ("gray", "#808080"),
];

/// Map defaults
pub const DEFAULT_ZOOM: u8 = 8;
pub const FALLBACK_CENTER: (f64, f64) = (51.1657, 10.4515); // Germany
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const SATELLITE_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const SATELLITE_ATTRIBUTION: &str = "Esri";
pub const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Output defaults
pub const DEFAULT_MAP_FILE: &str = "German_Boreholes_Map.html";
pub const COMBINED_CSV_SUFFIX: &str = "_combined.csv";
pub const DEFAULT_MAP_TITLE: &str = "German Boreholes Map";
