use crate::constants::{
    FALLBACK_PRIMARY, OVERLAY_CANVAS_ID, OVERLAY_STYLE, OVERLAY_Z_INDEX, PRIMARY_CSS_VAR,
    SMALL_SCREEN_QUERY,
};
use trail_core::Profile;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Touch-capable device or a phone-sized viewport.
pub fn detect_profile(window: &web::Window) -> Profile {
    let touch = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
        || window.navigator().max_touch_points() > 0;
    let small = window
        .match_media(SMALL_SCREEN_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);
    if touch || small {
        Profile::Mobile
    } else {
        Profile::Desktop
    }
}

/// Create the fixed overlay canvas and append it to `<body>`.
pub fn create_overlay_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no <body>"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_id(OVERLAY_CANVAS_ID);
    canvas
        .set_attribute(
            "style",
            &format!("{}z-index:{};", OVERLAY_STYLE, OVERLAY_Z_INDEX),
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = canvas.set_attribute("aria-hidden", "true");
    body.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    sync_canvas_backing_size(&canvas);
    Ok(canvas)
}

/// Match the canvas pixel size to the viewport times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let css_w = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let css_h = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        canvas.set_width(((css_w * dpr) as u32).max(1));
        canvas.set_height(((css_h * dpr) as u32).max(1));
    }
}

/// The page's `--primary` colour, resolved on the root element.
pub fn primary_color(window: &web::Window, document: &web::Document) -> String {
    document
        .document_element()
        .and_then(|root| window.get_computed_style(&root).ok().flatten())
        .and_then(|style| style.get_property_value(PRIMARY_CSS_VAR).ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| FALLBACK_PRIMARY.to_string())
}
