use crate::frame::SharedSession;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use zone_core::input::{command_for_key, held_key_for};
use zone_core::HeldKeys;

pub fn handle_keydown(ev: &web::KeyboardEvent, session: &SharedSession, held: &RefCell<HeldKeys>) {
    let key = ev.key();
    if let Some(k) = held_key_for(&key) {
        held.borrow_mut().set(k, true);
        if k != zone_core::input::HeldKey::Fast {
            ev.prevent_default();
        }
        return;
    }
    // Edges only: ignore auto-repeat.
    if ev.repeat() {
        return;
    }
    if let Some(cmd) = command_for_key(&key) {
        session.borrow_mut().handle_key(cmd);
    }
}

pub fn handle_keyup(ev: &web::KeyboardEvent, held: &RefCell<HeldKeys>) {
    if let Some(k) = held_key_for(&ev.key()) {
        held.borrow_mut().set(k, false);
    }
}

pub fn wire_keyboard(session: SharedSession, held: Rc<RefCell<HeldKeys>>) {
    let Some(window) = web::window() else {
        return;
    };
    let held_down = held.clone();
    let down = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &session, &held_down);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref());
    down.forget();

    let held_up = held.clone();
    let up = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_keyup(&ev, &held_up);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref());
    up.forget();

    // Losing focus drops keyup events; release everything.
    let blur = Closure::wrap(Box::new(move || {
        *held.borrow_mut() = HeldKeys::default();
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref());
    blur.forget();
}
