use crate::constants::{GRAIN_ID, SCENE_ROOT_ID, TINT_ID, VIGNETTE_ID};
use crate::dom::{self, js_err};
use anyhow::anyhow;
use mood_core::constants::GRAIN_TILE_PX;
use mood_core::post::{grain_tile, PostFrame};
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

/// Grain tile rendered once into a data URL.
fn grain_data_url(document: &web::Document, seed: u64) -> anyhow::Result<String> {
    let px = GRAIN_TILE_PX as u32;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    canvas.set_width(px);
    canvas.set_height(px);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("no 2d context for grain"))?
        .dyn_into()
        .map_err(js_err)?;
    let pixels = grain_tile(seed);
    let image = web::ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_slice()), px, px)
        .map_err(js_err)?;
    ctx.put_image_data(&image, 0.0, 0.0).map_err(js_err)?;
    canvas.to_data_url().map_err(js_err)
}

#[derive(Default)]
struct Written {
    filter: String,
    tint: String,
    blend: &'static str,
    vignette: String,
    grain: String,
    camera_class: Option<&'static str>,
}

pub struct PostView {
    root: web::HtmlElement,
    tint: Option<web::HtmlElement>,
    vignette: Option<web::HtmlElement>,
    grain: Option<web::HtmlElement>,
    written: Written,
}

impl PostView {
    pub fn mount(document: &web::Document, seed: u64) -> anyhow::Result<Self> {
        let root = dom::html(document, SCENE_ROOT_ID)
            .ok_or_else(|| anyhow!("missing #{SCENE_ROOT_ID}"))?;
        let grain = dom::html(document, GRAIN_ID);
        if let Some(g) = &grain {
            match grain_data_url(document, seed) {
                Ok(url) => dom::set_style(g, "background-image", &format!("url({url})")),
                Err(e) => log::warn!("[render] grain tile unavailable: {e}"),
            }
        }
        Ok(Self {
            root,
            tint: dom::html(document, TINT_ID),
            vignette: dom::html(document, VIGNETTE_ID),
            grain,
            written: Written::default(),
        })
    }

    pub fn draw(&mut self, frame: &PostFrame) {
        let filter = match &frame.glow {
            Some(glow) => format!("{} {}", frame.filter, glow.css()),
            None => frame.filter.clone(),
        };
        if filter != self.written.filter {
            dom::set_style(&self.root, "filter", &filter);
            self.written.filter = filter;
        }

        if let Some(tint) = &self.tint {
            let color = frame.tint.css();
            if color != self.written.tint {
                dom::set_style(tint, "background-color", &color);
                self.written.tint = color;
            }
            let blend = frame.blend.css();
            if blend != self.written.blend {
                dom::set_style(tint, "mix-blend-mode", blend);
                self.written.blend = blend;
            }
        }
        if let Some(v) = &self.vignette {
            let opacity = format!("{:.3}", frame.vignette_opacity);
            if opacity != self.written.vignette {
                dom::set_style(v, "opacity", &opacity);
                self.written.vignette = opacity;
            }
        }
        if let Some(g) = &self.grain {
            let opacity = format!("{:.3}", frame.grain_opacity);
            if opacity != self.written.grain {
                dom::set_style(g, "opacity", &opacity);
                self.written.grain = opacity;
            }
        }

        if frame.camera_class != self.written.camera_class {
            let list = self.root.class_list();
            if let Some(old) = self.written.camera_class {
                let _ = list.remove_1(old);
            }
            if let Some(new) = frame.camera_class {
                let _ = list.add_1(new);
            }
            self.written.camera_class = frame.camera_class;
        }
    }
}
