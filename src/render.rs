use crate::constants::*;
use crate::dom;
use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;
use trail_core::{FrameSnapshot, HistoryDot, ParticleDot};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Set when the page theme may have changed; the next frame re-reads the colour.
pub type StaleColor = Rc<Cell<bool>>;

/// Draws a [`FrameSnapshot`] onto the overlay canvas.
pub struct Renderer {
    window: web::Window,
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    color: String,
    stale_color: StaleColor,
}

impl Renderer {
    pub fn new(
        window: web::Window,
        document: web::Document,
        canvas: web::HtmlCanvasElement,
    ) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        let color = dom::primary_color(&window, &document);
        Ok(Self {
            window,
            document,
            canvas,
            ctx,
            color,
            stale_color: Rc::new(Cell::new(false)),
        })
    }

    /// Shared flag that invalidates the cached `--primary` colour.
    pub fn stale_color(&self) -> StaleColor {
        self.stale_color.clone()
    }

    fn refresh_color(&mut self) {
        if self.stale_color.replace(false) {
            self.color = dom::primary_color(&self.window, &self.document);
            log::debug!("[render] primary colour {}", self.color);
        }
    }

    pub fn clear(&self) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    pub fn draw(&mut self, snap: &FrameSnapshot) {
        self.clear();
        let dpr = self.window.device_pixel_ratio();
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.refresh_color();
        let color = self.color.as_str();

        for dot in &snap.particles {
            self.draw_particle(dot, color);
        }
        for dot in &snap.history {
            self.draw_history_dot(dot, color);
        }
        self.draw_marker(snap, color);

        self.ctx.set_global_alpha(1.0);
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_filter("none");
    }

    fn draw_particle(&self, dot: &ParticleDot, color: &str) {
        if dot.opacity <= 0.0 {
            return;
        }
        self.ctx.set_global_alpha(dot.opacity as f64);
        self.ctx.set_shadow_color(color);
        self.ctx.set_shadow_blur(dot.glow as f64);
        self.ctx.set_fill_style_str(color);
        self.fill_circle(
            dot.position.x as f64,
            dot.position.y as f64,
            dot.size as f64 / 2.0,
        );
    }

    fn draw_history_dot(&self, dot: &HistoryDot, color: &str) {
        let r = (dot.size * dot.scale) as f64 / 2.0;
        if dot.opacity <= 0.0 || r <= 0.0 {
            return;
        }
        self.ctx.set_filter(&format!("blur({:.2}px)", dot.blur));
        self.ctx.set_global_alpha(dot.opacity as f64);
        self.ctx.set_shadow_color(color);
        self.ctx.set_shadow_blur(dot.glow as f64);
        self.ctx.set_fill_style_str(color);
        self.fill_circle(dot.position.x as f64, dot.position.y as f64, r);
        self.ctx.set_filter("none");
    }

    fn draw_marker(&self, snap: &FrameSnapshot, color: &str) {
        let m = snap.marker;
        let size = snap.marker_size as f64;
        let left = (snap.position.x - m.offset.x) as f64;
        let top = (snap.position.y - m.offset.y) as f64;
        let ctx = &self.ctx;

        ctx.save();
        _ = ctx.translate(left + size / 2.0, top + size / 2.0);
        _ = ctx.rotate((m.rotation_deg as f64).to_radians());
        _ = ctx.scale(m.scale as f64, m.scale as f64);
        ctx.set_global_alpha(m.opacity.clamp(0.0, 1.0) as f64);
        if snap.moving {
            ctx.set_shadow_color(MOVING_SHADOW);
            ctx.set_shadow_blur(MOVING_SHADOW_BLUR);
        } else {
            ctx.set_shadow_blur(0.0);
        }
        let radius = (m.corner_radius.clamp(0.0, 0.5) as f64) * size;
        rounded_square(ctx, size, radius);
        if snap.moving {
            ctx.set_fill_style_str(MOVING_FILL);
            ctx.fill();
        }
        ctx.set_line_width(MARKER_BORDER_WIDTH);
        ctx.set_stroke_style_str(color);
        ctx.stroke();
        ctx.restore();
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, r, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }
}

// Square of side `size` centred on the origin.
fn rounded_square(ctx: &web::CanvasRenderingContext2d, size: f64, radius: f64) {
    let h = size / 2.0;
    ctx.begin_path();
    ctx.move_to(-h + radius, -h);
    _ = ctx.arc_to(h, -h, h, h, radius);
    _ = ctx.arc_to(h, h, -h, h, radius);
    _ = ctx.arc_to(-h, h, -h, -h, radius);
    _ = ctx.arc_to(-h, -h, h, -h, radius);
    ctx.close_path();
}
