use crate::audio::WebAudioBackend;
use crate::frame::SharedSession;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// On page hide, write any pending calibration and release zone audio so a
/// debounced save is not lost when the tab closes.
pub fn wire_pagehide(session: SharedSession, audio: Rc<RefCell<WebAudioBackend>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        let mut audio = audio.borrow_mut();
        session.borrow_mut().shutdown(&mut *audio, Instant::now());
        log::info!("[frame] page hidden, session shut down");
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}
