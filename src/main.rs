//! Cricket Draw entry point
//!
//! The web build is driven from the page through `platform::web`. Natively
//! this runs one complete draw against an in-memory store and logs it.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cricket Draw (native) starting...");

    if let Err(e) = demo_draw(11) {
        log::error!("Demo draw failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_draw(players: u32) -> cricket_draw::Result<()> {
    use cricket_draw::platform::now_ms;
    use cricket_draw::{DrawSession, MemoryStore, SessionStore};

    let mut store = SessionStore::new(MemoryStore::new());
    let mut session = DrawSession::start(players, &mut rand::rng())?;
    store.save(&session)?;

    while !session.is_exhausted() {
        let record = session.draw_next(now_ms())?;
        store.save(&session)?;
        let (remaining, total) = session.remaining_count();
        log::info!(
            "{} drew {} ({} / {} left)",
            record.name(),
            record.number(),
            remaining,
            total
        );
    }

    if let Some(first) = session.history().first().map(|r| r.id()) {
        session.rename(first, "Captain")?;
        store.save(&session)?;
    }

    let restored = store.load().unwrap_or_default();
    for record in restored.history_newest_first() {
        log::info!("{}: {}", record.name(), record.number());
    }

    session.reset();
    store.clear()?;
    log::info!("All set!");
    Ok(())
}
