use crate::assets::ImageBank;
use crate::constants::*;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;
use zone_core::{DrawCommand, Handedness};

/// Canvas2D painter for the engine's draw list.
pub struct Painter {
    ctx: web::CanvasRenderingContext2d,
}

impl Painter {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext failed: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        Ok(Self { ctx })
    }

    #[allow(deprecated)]
    fn fill(&self, style: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(style));
    }

    #[allow(deprecated)]
    fn stroke(&self, style: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(style));
    }

    fn circle_path(&self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        _ = self.ctx.arc(x, y, r.max(0.0), 0.0, TAU);
    }

    pub fn paint(&self, width: f64, height: f64, commands: &[DrawCommand], images: &ImageBank) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        self.fill(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, width, height);
        ctx.set_font(FONT);
        ctx.set_text_align("center");

        for cmd in commands {
            match cmd {
                DrawCommand::Circle { center, radius } => {
                    ctx.set_line_width(2.0);
                    self.stroke(CIRCLE_STROKE);
                    self.circle_path(center.x as f64, center.y as f64, *radius as f64);
                    ctx.stroke();
                }
                DrawCommand::Axes { center, radius } => {
                    let (cx, cy, r) = (center.x as f64, center.y as f64, *radius as f64);
                    ctx.set_line_width(1.0);
                    self.stroke(AXIS_STROKE);
                    ctx.begin_path();
                    ctx.move_to(cx - r, cy);
                    ctx.line_to(cx + r, cy);
                    ctx.move_to(cx, cy - r);
                    ctx.line_to(cx, cy + r);
                    ctx.stroke();
                }
                DrawCommand::Ring {
                    center,
                    radius,
                    year,
                    highlighted,
                } => {
                    let (cx, cy, r) = (center.x as f64, center.y as f64, *radius as f64);
                    ctx.set_line_width(if *highlighted { 2.5 } else { 1.0 });
                    self.stroke(if *highlighted { RING_HIGHLIGHT } else { RING_STROKE });
                    self.circle_path(cx, cy, r);
                    ctx.stroke();
                    self.fill(if *highlighted { RING_HIGHLIGHT } else { LABEL_FILL });
                    _ = ctx.fill_text(&year.to_string(), cx, cy - r - 4.0);
                }
                DrawCommand::QuadrantLabel {
                    quadrant,
                    position,
                    active,
                } => {
                    self.fill(if *active { LABEL_ACTIVE_FILL } else { LABEL_FILL });
                    _ = ctx.fill_text(
                        &format!("Q{}", quadrant.number()),
                        position.x as f64,
                        position.y as f64,
                    );
                }
                DrawCommand::Symbol {
                    position,
                    size,
                    alpha,
                    image,
                } => {
                    let Some(img) = image.and_then(|i| images.get(i)) else {
                        continue;
                    };
                    let s = *size as f64;
                    ctx.set_global_alpha(*alpha as f64);
                    _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        position.x as f64 - s * 0.5,
                        position.y as f64 - s * 0.5,
                        s,
                        s,
                    );
                    ctx.set_global_alpha(1.0);
                }
                DrawCommand::Fingertip {
                    position,
                    handedness,
                    ..
                } => {
                    self.fill(match handedness {
                        Handedness::Left => LEFT_HAND_FILL,
                        Handedness::Right => RIGHT_HAND_FILL,
                    });
                    self.circle_path(position.x as f64, position.y as f64, FINGERTIP_RADIUS_PX);
                    ctx.fill();
                }
                DrawCommand::CalibrationArea { area, sensor } => {
                    let scale = CALIBRATION_BOX_WIDTH_PX / sensor.x.max(1.0) as f64;
                    let (ox, oy) = (CALIBRATION_BOX_MARGIN_PX, CALIBRATION_BOX_MARGIN_PX);
                    ctx.set_line_width(1.0);
                    self.stroke(CALIBRATION_FRAME_STROKE);
                    ctx.stroke_rect(ox, oy, sensor.x as f64 * scale, sensor.y as f64 * scale);
                    ctx.set_line_width(2.0);
                    self.stroke(CALIBRATION_AREA_STROKE);
                    ctx.stroke_rect(
                        ox + area.x as f64 * scale,
                        oy + area.y as f64 * scale,
                        area.width as f64 * scale,
                        area.height as f64 * scale,
                    );
                }
                DrawCommand::ModeLabel { text, .. } => {
                    ctx.set_text_align("left");
                    self.fill(LABEL_ACTIVE_FILL);
                    _ = ctx.fill_text(text, CALIBRATION_BOX_MARGIN_PX, height - CALIBRATION_BOX_MARGIN_PX);
                    ctx.set_text_align("center");
                }
            }
        }
    }
}
