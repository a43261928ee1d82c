use crate::constants::PARTICLE_CANVAS_ID;
use crate::dom::{self, js_err};
use anyhow::anyhow;
use mood_core::particles::Sprite;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct ParticleCanvas {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    dpr: f64,
}

impl ParticleCanvas {
    pub fn mount(document: &web::Document) -> anyhow::Result<Self> {
        let canvas: web::HtmlCanvasElement = dom::element(document, PARTICLE_CANVAS_ID)
            .ok_or_else(|| anyhow!("missing #{PARTICLE_CANVAS_ID}"))?;
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| anyhow!("no 2d context"))?
            .dyn_into()
            .map_err(js_err)?;
        let mut view = Self {
            canvas,
            ctx,
            dpr: 1.0,
        };
        view.sync_size();
        Ok(view)
    }

    /// Match the backing store to the CSS size. Returns the viewport in CSS
    /// pixels, which is the space the simulation runs in.
    pub fn sync_size(&mut self) -> (f32, f32) {
        dom::sync_canvas_backing_size(&self.canvas);
        self.dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width() as f32, rect.height() as f32)
    }

    pub fn draw(&self, sprites: impl Iterator<Item = Sprite>) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        let _ = ctx.scale(self.dpr, self.dpr);

        for sprite in sprites {
            match sprite {
                Sprite::Streak { from, to, color } => {
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(1.0);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                Sprite::Bird { at, wing, color } => {
                    let (x, y, w) = (at.x as f64, at.y as f64, wing as f64);
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(1.5);
                    ctx.begin_path();
                    ctx.move_to(x - 6.0, y - w);
                    ctx.line_to(x, y);
                    ctx.line_to(x + 6.0, y - w);
                    ctx.stroke();
                }
                Sprite::Square { at, size, color } => {
                    ctx.set_fill_style_str(&color.css());
                    let s = size as f64;
                    ctx.fill_rect(at.x as f64 - s / 2.0, at.y as f64 - s / 2.0, s, s);
                }
                Sprite::Disc { at, radius, color } => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.begin_path();
                    let _ = ctx.arc(at.x as f64, at.y as f64, radius.max(0.0) as f64, 0.0, TAU);
                    ctx.fill();
                }
            }
        }
    }

    pub fn clear(&self) {
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }
}
