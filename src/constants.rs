// DOM and drawing constants for the browser host.
//
// Simulation tuning lives in `trail_core::constants`; these only affect how a
// frame is put on screen.

// Overlay canvas
pub const OVERLAY_CANVAS_ID: &str = "cursor-trail-canvas";
pub const OVERLAY_Z_INDEX: u32 = 9995; // below the marker layer used by the page
pub const OVERLAY_STYLE: &str =
    "position:fixed;top:0;left:0;width:100vw;height:100vh;pointer-events:none;";

// Colour
pub const PRIMARY_CSS_VAR: &str = "--primary";
pub const FALLBACK_PRIMARY: &str = "#00bcd4";
pub const MOVING_FILL: &str = "rgba(0,188,212,0.2)";
pub const MOVING_SHADOW: &str = "rgba(0,188,212,0.3)";
pub const MOVING_SHADOW_BLUR: f64 = 10.0;

// Marker stroke
pub const MARKER_BORDER_WIDTH: f64 = 2.0;

// Device detection
pub const SMALL_SCREEN_QUERY: &str = "(max-width: 480px)";

// Theme changes that invalidate the cached primary colour
pub const THEME_ATTRIBUTES: &[&str] = &["class", "style", "data-theme"];
pub const COLOR_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
