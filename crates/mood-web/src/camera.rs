use crate::bridge::BridgeClient;
use crate::dom::js_err;
use anyhow::anyhow;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[derive(Clone, Copy, Debug)]
pub struct CaptureSettings {
    pub interval_ms: i32,
    pub width: u32,
    pub jpeg_quality: f64,
}

/// Downscaled, mirrored frame size keeping the video's aspect ratio.
#[inline]
fn capture_size(video_w: u32, video_h: u32, target_w: u32) -> Option<(u32, u32)> {
    if video_w == 0 || video_h == 0 {
        return None;
    }
    let h = (target_w as f64 * video_h as f64 / video_w as f64).round() as u32;
    Some((target_w, h.max(1)))
}

/// The granted stream and the preview showing it. Every track is stopped
/// on release or drop, so an early return after the grant leaks nothing.
struct Device {
    stream: web::MediaStream,
    video: web::HtmlVideoElement,
    released: bool,
}

impl Device {
    fn attach(stream: web::MediaStream, video: web::HtmlVideoElement) -> Self {
        video.set_muted(true);
        video.set_src_object(Some(&stream));
        Self {
            stream,
            video,
            released: false,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.release();
    }
}

/// Live camera preview plus a periodic JPEG capture sent over the bridge.
pub struct CameraCapture {
    device: Device,
    interval: Option<i32>,
    _tick: Closure<dyn FnMut()>,
}

impl CameraCapture {
    /// Ask for the camera and start capturing. Fails when the user denies
    /// access or no camera exists.
    pub async fn start(
        document: &web::Document,
        video: web::HtmlVideoElement,
        bridge: Rc<BridgeClient>,
        settings: CaptureSettings,
    ) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let devices = window.navigator().media_devices().map_err(js_err)?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        constraints.set_audio(&JsValue::FALSE);
        let stream: web::MediaStream = JsFuture::from(
            devices
                .get_user_media_with_constraints(&constraints)
                .map_err(js_err)?,
        )
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

        let device = Device::attach(stream, video.clone());
        if let Ok(p) = video.play() {
            let _ = JsFuture::from(p).await;
        }

        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| anyhow!("no 2d context for capture"))?
            .dyn_into()
            .map_err(js_err)?;

        let tick = {
            let video = video.clone();
            Closure::wrap(Box::new(move || {
                let Some((w, h)) = capture_size(video.video_width(), video.video_height(), settings.width)
                else {
                    return;
                };
                if canvas.width() != w || canvas.height() != h {
                    canvas.set_width(w);
                    canvas.set_height(h);
                }
                ctx.save();
                let _ = ctx.translate(w as f64, 0.0);
                let _ = ctx.scale(-1.0, 1.0);
                let _ = ctx.draw_image_with_html_video_element_and_dw_and_dh(
                    &video, 0.0, 0.0, w as f64, h as f64,
                );
                ctx.restore();
                match canvas.to_data_url_with_type_and_encoder_options(
                    "image/jpeg",
                    &JsValue::from_f64(settings.jpeg_quality),
                ) {
                    Ok(url) => {
                        if let Some((_, b64)) = url.split_once(',') {
                            bridge.send_frame(b64);
                        }
                    }
                    Err(e) => log::warn!("[camera] encode failed: {:?}", e),
                }
            }) as Box<dyn FnMut()>)
        };
        let interval = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                settings.interval_ms,
            )
            .map_err(js_err)?;
        log::info!("[camera] capturing every {} ms", settings.interval_ms);

        Ok(Self {
            device,
            interval: Some(interval),
            _tick: tick,
        })
    }

    /// Stop capture and release the device. Idempotent.
    pub fn stop(&mut self) {
        if let Some(id) = self.interval.take() {
            if let Some(w) = web::window() {
                w.clear_interval_with_handle(id);
            }
            log::info!("[camera] stopped");
        }
        self.device.release();
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
