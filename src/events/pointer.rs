use crate::audio::WebAudioBackend;
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Browsers keep the AudioContext suspended until a user gesture. The first
/// pointer-down resumes it and dismisses the start overlay.
pub fn wire_audio_unlock(document: &web::Document, audio: Rc<RefCell<WebAudioBackend>>) {
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        audio.borrow().unlock();
        overlay::hide(&doc);
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}
