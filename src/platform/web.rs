//! Browser entry points
//!
//! `DrawApp` is what the page script holds. Every mutation is saved to
//! LocalStorage before the call returns.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use super::now_ms;
use super::storage::LocalStorage;
use crate::draw::{DrawRecord, DrawSession, RecordId, parse_player_count};
use crate::error::DrawError;
use crate::persistence::SessionStore;
use crate::settings::Settings;

fn to_js(e: DrawError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn record_to_js(record: &DrawRecord) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(record).map_err(|e| to_js(e.into()))?;
    js_sys::JSON::parse(&json)
}

/// Resolve after `ms` milliseconds (immediately for 0)
async fn sleep_ms(ms: u32) -> Result<(), JsValue> {
    if ms == 0 {
        return Ok(());
    }
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}

struct Inner {
    session: DrawSession,
    store: SessionStore<LocalStorage>,
    settings: Settings,
}

/// Draw session bound to the page's LocalStorage
#[wasm_bindgen]
pub struct DrawApp {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl DrawApp {
    /// Open storage and restore any saved draw
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<DrawApp, JsValue> {
        let storage = LocalStorage::open().map_err(to_js)?;
        let settings = Settings::load(&storage);
        let mut store = SessionStore::new(storage);
        let session = store.load().unwrap_or_default();

        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                session,
                store,
                settings,
            })),
        })
    }

    /// Start a new draw from the raw player-count text. Wipes any prior draw.
    pub fn start(&self, players: &str) -> Result<(), JsValue> {
        let total = parse_player_count(players).map_err(to_js)?;
        let mut guard = self.inner.borrow_mut();
        let Inner { session, store, .. } = &mut *guard;
        session.restart(total, &mut rand::rng()).map_err(to_js)?;
        store.save(session).map_err(to_js)
    }

    /// Draw the next number after the reveal delay.
    ///
    /// Resolves to `{id, name, number}`. Rejects straight away if a draw is
    /// already pending or the pool is empty.
    pub fn draw(&self) -> Promise {
        let inner = self.inner.clone();
        future_to_promise(async move {
            let (ticket, delay) = {
                let mut guard = inner.borrow_mut();
                let ticket = guard.session.begin_draw().map_err(to_js)?;
                (ticket, guard.settings.effective_reveal_delay_ms())
            };

            sleep_ms(delay).await?;

            let mut guard = inner.borrow_mut();
            let Inner { session, store, .. } = &mut *guard;
            let record = session.complete_draw(ticket, now_ms()).map_err(to_js)?;
            store.save(session).map_err(to_js)?;
            record_to_js(&record)
        })
    }

    /// Random number to flash while a draw is pending
    pub fn placeholder(&self) -> Option<u32> {
        self.inner.borrow().session.placeholder(&mut rand::rng())
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<(), JsValue> {
        let id: RecordId = id
            .parse()
            .map_err(|_| JsValue::from_str(&format!("Invalid record id: {}", id)))?;
        let mut guard = self.inner.borrow_mut();
        let Inner { session, store, .. } = &mut *guard;
        session.rename(id, name).map_err(to_js)?;
        store.save(session).map_err(to_js)
    }

    /// End the draw and forget it
    pub fn reset(&self) -> Result<(), JsValue> {
        let mut guard = self.inner.borrow_mut();
        let Inner { session, store, .. } = &mut *guard;
        session.reset();
        store.clear().map_err(to_js)
    }

    pub fn remaining(&self) -> u32 {
        self.inner.borrow().session.remaining_count().0
    }

    pub fn total(&self) -> u32 {
        self.inner.borrow().session.remaining_count().1
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner.borrow().session.is_active()
    }

    #[wasm_bindgen(js_name = isExhausted)]
    pub fn is_exhausted(&self) -> bool {
        self.inner.borrow().session.is_exhausted()
    }

    #[wasm_bindgen(js_name = isDrawing)]
    pub fn is_drawing(&self) -> bool {
        self.inner.borrow().session.is_drawing()
    }

    /// History as a JSON array, newest first
    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> Result<String, JsValue> {
        let guard = self.inner.borrow();
        let newest_first: Vec<&DrawRecord> = guard.session.history_newest_first().collect();
        serde_json::to_string(&newest_first).map_err(|e| to_js(e.into()))
    }

    /// Interval for swapping placeholder numbers during a reveal
    #[wasm_bindgen(js_name = placeholderIntervalMs)]
    pub fn placeholder_interval_ms(&self) -> u32 {
        self.inner.borrow().settings.placeholder_interval_ms
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&self, enabled: bool) -> Result<(), JsValue> {
        let mut guard = self.inner.borrow_mut();
        let Inner {
            store, settings, ..
        } = &mut *guard;
        settings.reduced_motion = enabled;
        settings.save(store.store_mut()).map_err(to_js)
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Cricket draw ready");
}
