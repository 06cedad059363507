#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;
use zone_core::{parse_hands, DetectionSlot, EngineConfig, HandSample, HeldKeys, ImageCatalog, Session};

mod assets;
mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod storage;
mod voicing;

thread_local! {
    // Written by the pose callback, read by the frame loop. No handoff: a frame
    // may see the previous result.
    static DETECTIONS: RefCell<DetectionSlot> = RefCell::new(DetectionSlot::default());
}

/// Called by the JS pose glue with each detection result as JSON:
/// `[{"handedness":"Left","landmarks":[{"x":..,"y":..}, ...21]}]`.
#[wasm_bindgen]
pub fn submit_hands_json(json: &str) {
    match parse_hands(json) {
        Ok(hands) => DETECTIONS.with(|slot| slot.borrow_mut().publish(hands)),
        Err(e) => log::warn!("[hands] ignoring detection result: {}", e),
    }
}

pub(crate) fn latest_hands() -> Vec<HandSample> {
    DETECTIONS.with(|slot| slot.borrow().latest().to_vec())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("zone-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    dom::wire_canvas_resize(&canvas);
    let painter = render::Painter::new(&canvas)?;

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let audio = audio::WebAudioBackend::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("audio graph: {}", e))?;
    audio.unlock();
    let audio = Rc::new(RefCell::new(audio));

    let catalog = ImageCatalog::standard();
    let images = assets::ImageBank::load(&catalog);
    let session = Rc::new(RefCell::new(Session::new(
        EngineConfig::default(),
        storage::BrowserStore::open(),
        catalog,
        dom::canvas_size(&canvas),
    )));
    let held = Rc::new(RefCell::new(HeldKeys::default()));

    events::wire_keyboard(session.clone(), held.clone());
    events::wire_audio_unlock(&document, audio.clone());
    events::wire_pagehide(session.clone(), audio.clone());
    overlay::show(&document);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        audio,
        held,
        canvas,
        painter,
        images,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
