use crate::assets::ImageBank;
use crate::audio::WebAudioBackend;
use crate::dom;
use crate::render::Painter;
use crate::storage::BrowserStore;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use zone_core::{FrameInput, HeldKeys, Session};

pub type SharedSession = Rc<RefCell<Session<BrowserStore>>>;

// Frames slower than this are logged; usually a hidden tab or a GC pause.
const SLOW_FRAME: Duration = Duration::from_millis(250);

pub struct FrameContext {
    pub session: SharedSession,
    pub audio: Rc<RefCell<WebAudioBackend>>,
    pub held: Rc<RefCell<HeldKeys>>,
    pub canvas: web::HtmlCanvasElement,
    pub painter: Painter,
    pub images: ImageBank,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = zone_core::clock::since(now, self.last_instant);
        self.last_instant = now;
        if dt > SLOW_FRAME {
            log::debug!("[frame] slow frame: {} ms", dt.as_millis());
        }

        let display = dom::canvas_size(&self.canvas);
        let hands = crate::latest_hands();
        let held = *self.held.borrow();
        let commands = {
            let mut audio = self.audio.borrow_mut();
            self.session.borrow_mut().frame(
                &FrameInput {
                    hands: &hands,
                    held,
                    display,
                    now,
                },
                &mut *audio,
            )
        };
        self.painter
            .paint(display.x as f64, display.y as f64, &commands, &self.images);
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
