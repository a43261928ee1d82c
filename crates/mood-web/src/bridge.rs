use mood_core::bridge::{encode_frame, BridgeHub, BridgeState, SubscriberId};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Handlers {
    on_open: Closure<dyn FnMut(web::Event)>,
    on_message: Closure<dyn FnMut(web::MessageEvent)>,
    on_error: Closure<dyn FnMut(web::Event)>,
    on_close: Closure<dyn FnMut(web::CloseEvent)>,
}

struct Inner {
    url: String,
    reconnect_ms: i32,
    socket: Option<web::WebSocket>,
    handlers: Option<Handlers>,
    retry_timer: Option<i32>,
    hub: BridgeHub,
    closed: bool,
}

/// WebSocket link to the camera inference service. Reconnects after a
/// fixed delay whenever the socket drops, until closed.
pub struct BridgeClient {
    inner: Rc<RefCell<Inner>>,
}

impl BridgeClient {
    pub fn connect(url: &str, reconnect_ms: u64) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            url: url.to_string(),
            reconnect_ms: reconnect_ms.min(i32::MAX as u64) as i32,
            socket: None,
            handlers: None,
            retry_timer: None,
            hub: BridgeHub::new(),
            closed: false,
        }));
        open(&inner);
        Self { inner }
    }

    /// Send one captured frame. Dropped silently while disconnected.
    pub fn send_frame(&self, base64_jpeg: &str) {
        let inner = self.inner.borrow();
        let Some(ws) = inner.socket.as_ref() else {
            return;
        };
        if ws.ready_state() != web::WebSocket::OPEN {
            return;
        }
        match encode_frame(base64_jpeg) {
            Ok(msg) => {
                if let Err(e) = ws.send_with_str(&msg) {
                    log::warn!("[bridge] send failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("[bridge] {e}"),
        }
    }

    /// The listener is called immediately with the cached state, then on
    /// every update. It must not call back into the client.
    pub fn subscribe(&self, listener: impl FnMut(BridgeState) + 'static) -> SubscriberId {
        self.inner.borrow_mut().hub.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.borrow_mut().hub.unsubscribe(id)
    }

    pub fn latest(&self) -> BridgeState {
        self.inner.borrow().hub.latest()
    }

    /// Stop reconnecting and close the socket. Idempotent.
    pub fn close(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.closed {
            return;
        }
        inner.closed = true;
        if let Some(id) = inner.retry_timer.take() {
            if let Some(w) = web::window() {
                w.clear_timeout_with_handle(id);
            }
        }
        if let Some(ws) = inner.socket.take() {
            detach(&ws);
            let _ = ws.close();
        }
        inner.handlers = None;
        log::info!("[bridge] closed");
    }
}

fn detach(ws: &web::WebSocket) {
    ws.set_onopen(None);
    ws.set_onmessage(None);
    ws.set_onerror(None);
    ws.set_onclose(None);
}

fn open(inner: &Rc<RefCell<Inner>>) {
    let url = {
        let mut i = inner.borrow_mut();
        if i.closed {
            return;
        }
        i.retry_timer = None;
        i.url.clone()
    };
    let ws = match web::WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            log::warn!("[bridge] cannot open {url}: {:?}", e);
            schedule_reconnect(inner);
            return;
        }
    };

    let on_open = {
        let url = url.clone();
        Closure::wrap(Box::new(move |_: web::Event| {
            log::info!("[bridge] connected to {url}");
        }) as Box<dyn FnMut(web::Event)>)
    };
    let on_message = {
        let weak = Rc::downgrade(inner);
        Closure::wrap(Box::new(move |ev: web::MessageEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Some(raw) = ev.data().as_string() else {
                log::debug!("[bridge] ignoring non-text message");
                return;
            };
            let mut i = inner.borrow_mut();
            if let Err(e) = i.hub.handle_message(&raw) {
                log::warn!("[bridge] {e}");
            }
        }) as Box<dyn FnMut(web::MessageEvent)>)
    };
    let on_error = Closure::wrap(Box::new(move |_: web::Event| {
        log::warn!("[bridge] socket error");
    }) as Box<dyn FnMut(web::Event)>);
    let on_close = {
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(inner);
        Closure::wrap(Box::new(move |ev: web::CloseEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            log::warn!("[bridge] disconnected (code {})", ev.code());
            inner.borrow_mut().socket = None;
            schedule_reconnect(&inner);
        }) as Box<dyn FnMut(web::CloseEvent)>)
    };

    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let mut i = inner.borrow_mut();
    if let Some(old) = i.socket.replace(ws) {
        detach(&old);
        let _ = old.close();
    }
    i.handlers = Some(Handlers {
        on_open,
        on_message,
        on_error,
        on_close,
    });
}

fn schedule_reconnect(inner: &Rc<RefCell<Inner>>) {
    let (delay, weak) = {
        let i = inner.borrow();
        if i.closed || i.retry_timer.is_some() {
            return;
        }
        (i.reconnect_ms, Rc::downgrade(inner))
    };
    let Some(w) = web::window() else {
        return;
    };
    let retry = Closure::once_into_js(move || {
        if let Some(inner) = weak.upgrade() {
            log::info!("[bridge] reconnecting");
            open(&inner);
        }
    });
    match w.set_timeout_with_callback_and_timeout_and_arguments_0(retry.unchecked_ref(), delay) {
        Ok(id) => inner.borrow_mut().retry_timer = Some(id),
        Err(e) => log::warn!("[bridge] reconnect timer failed: {:?}", e),
    }
}
