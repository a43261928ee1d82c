use crate::constants::{
    CELESTIAL_ID, LAYERS_ID, MOON_CLASS, NEAR_MIST_ID, SKY_ID, SUN_CLASS, SWAY_GENTLE_CLASS,
    SWAY_HEAVY_CLASS,
};
use crate::dom::{self, js_err};
use anyhow::anyhow;
use mood_core::constants::{TILE_REPEAT, TILE_WIDTH_PX};
use mood_core::parallax::{LayerKind, LayerView, SkyView, LAYERS, NEAR_MIST_Z};
use mood_core::Emotion;
use wasm_bindgen::JsCast;
use web_sys as web;

fn class_for(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Clouds => "layer-clouds",
        LayerKind::FarHills => "layer-far-hills",
        LayerKind::FogFar => "layer-fog-far",
        LayerKind::MidHills => "layer-mid-hills",
        LayerKind::NearHills => "layer-near-hills",
        LayerKind::FogMid => "layer-fog-mid",
        LayerKind::GodRays => "layer-god-rays",
        LayerKind::DenseForest => "layer-dense-forest",
        LayerKind::HeroTrees => "layer-hero-trees",
        LayerKind::Foreground => "layer-foreground",
    }
}

/// Only touch the DOM when the value actually changed.
#[derive(Default)]
struct Written {
    transform: String,
    color: String,
    opacity: String,
}

fn write_if_changed(el: &web::HtmlElement, property: &str, cache: &mut String, value: String) {
    if *cache != value {
        dom::set_style(el, property, &value);
        *cache = value;
    }
}

struct BandEl {
    el: web::HtmlElement,
    written: Written,
}

/// DOM side of the parallax compositor: one strip per band, each holding
/// a few repeated tiles so the wrap seam is never on screen.
pub struct LayerStack {
    bands: Vec<BandEl>,
    sky: web::HtmlElement,
    sky_written: String,
    near_mist: web::HtmlElement,
    mist_written: Written,
    celestial: Option<web::HtmlElement>,
    celestial_color: String,
    night: Option<bool>,
    windy: Option<bool>,
}

impl LayerStack {
    pub fn mount(document: &web::Document) -> anyhow::Result<Self> {
        let host = dom::html(document, LAYERS_ID).ok_or_else(|| anyhow!("missing #{LAYERS_ID}"))?;
        let sky = dom::html(document, SKY_ID).ok_or_else(|| anyhow!("missing #{SKY_ID}"))?;
        let near_mist =
            dom::html(document, NEAR_MIST_ID).ok_or_else(|| anyhow!("missing #{NEAR_MIST_ID}"))?;
        dom::set_style(&near_mist, "z-index", &NEAR_MIST_Z.to_string());

        host.set_inner_html("");
        let mut bands = Vec::with_capacity(LAYERS.len());
        for spec in LAYERS.iter() {
            let el: web::HtmlElement = document
                .create_element("div")
                .map_err(js_err)?
                .dyn_into()
                .map_err(js_err)?;
            el.set_class_name(&format!("layer {}", class_for(spec.kind)));
            dom::set_style(&el, "z-index", &spec.z_index.to_string());
            dom::set_style(&el, "top", &format!("{}%", spec.offset_y_pct));
            dom::set_style(&el, "width", &format!("{}px", TILE_WIDTH_PX * TILE_REPEAT as f32));
            for _ in 0..TILE_REPEAT {
                let tile = document.create_element("div").map_err(js_err)?;
                tile.set_class_name("tile");
                el.append_child(&tile).map_err(js_err)?;
            }
            host.append_child(&el).map_err(js_err)?;
            bands.push(BandEl {
                el,
                written: Written::default(),
            });
        }
        log::debug!("[render] mounted {} parallax bands", bands.len());

        Ok(Self {
            bands,
            sky,
            sky_written: String::new(),
            near_mist,
            mist_written: Written::default(),
            celestial: dom::html(document, CELESTIAL_ID),
            celestial_color: String::new(),
            night: None,
            windy: None,
        })
    }

    pub fn draw(&mut self, views: impl Iterator<Item = LayerView>, sky: &SkyView) {
        for (band, view) in self.bands.iter_mut().zip(views) {
            write_if_changed(
                &band.el,
                "transform",
                &mut band.written.transform,
                format!("translate3d({:.1}px, 0, 0)", view.translate_x),
            );
            write_if_changed(&band.el, "--layer-color", &mut band.written.color, view.color.css());
            write_if_changed(
                &band.el,
                "opacity",
                &mut band.written.opacity,
                format!("{:.3}", view.opacity),
            );
        }

        let gradient = sky.gradient.css();
        if gradient != self.sky_written {
            dom::set_style(&self.sky, "background", &gradient);
            self.sky_written = gradient;
        }
        write_if_changed(
            &self.near_mist,
            "--layer-color",
            &mut self.mist_written.color,
            sky.near_mist_color.css(),
        );
        write_if_changed(
            &self.near_mist,
            "opacity",
            &mut self.mist_written.opacity,
            format!("{:.3}", sky.near_mist_opacity),
        );
        if let Some(c) = &self.celestial {
            write_if_changed(c, "background-color", &mut self.celestial_color, sky.highlight.css());
        }
    }

    /// Sun or moon, and how hard the hero trees sway.
    pub fn set_mood(&mut self, emotion: Emotion) {
        let night = emotion.is_night();
        if self.night != Some(night) {
            if let Some(c) = &self.celestial {
                if night {
                    dom::swap_class(c, MOON_CLASS, SUN_CLASS);
                } else {
                    dom::swap_class(c, SUN_CLASS, MOON_CLASS);
                }
            }
            self.night = Some(night);
        }
        let windy = emotion.is_windy();
        if self.windy != Some(windy) {
            let hero = self
                .bands
                .iter()
                .zip(LAYERS.iter())
                .find(|(_, spec)| spec.kind == LayerKind::HeroTrees);
            if let Some((band, _)) = hero {
                if windy {
                    dom::swap_class(&band.el, SWAY_HEAVY_CLASS, SWAY_GENTLE_CLASS);
                } else {
                    dom::swap_class(&band.el, SWAY_GENTLE_CLASS, SWAY_HEAVY_CLASS);
                }
            }
            self.windy = Some(windy);
        }
    }
}
