//! Gemini Runner entry point
//!
//! On the web the JS front end drives `platform::web::WebSession`; natively this
//! runs a seeded headless demo run and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {err}").into());
    }
    log::info!("Gemini Runner engine loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x6E_4D_1Eu64);
    log::info!("Gemini Runner (native demo) starting with seed {seed}");

    let summary = demo::run(seed);
    match summary {
        Some(run) => println!(
            "{:?}: score {} | level {} | gems {} | distance {} LY | letters {}/6",
            run.outcome, run.score, run.level, run.gems_collected, run.distance, run.letters_collected
        ),
        None => println!("Demo run did not finish"),
    }
}

/// Seeded autoplay that stands in for the runner physics
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use gemini_runner::consts::*;
    use gemini_runner::sim::{Session, SessionStatus, TickInput, tick};
    use gemini_runner::RunSummary;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Give up after ten simulated minutes
    const MAX_TICKS: u64 = 10 * 60 * TICKS_PER_SECOND;
    /// Ticks per level before the demo reports a level clear
    const LEVEL_LENGTH_TICKS: u64 = 40 * TICKS_PER_SECOND;

    pub fn run(seed: u64) -> Option<RunSummary> {
        let mut session = Session::new(seed);
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5EED);
        session.start_game().ok()?;

        for t in 1..=MAX_TICKS {
            if session.status() != SessionStatus::Playing {
                break;
            }
            let speed = RUN_SPEED_BASE * (1.0 + 0.25 * (session.player().level() - 1) as f32);
            let input = TickInput {
                move_left: rng.random_bool(0.01),
                move_right: rng.random_bool(0.01),
                jump: rng.random_bool(0.02),
                grounded: rng.random_bool(0.5),
                activate_ability: rng.random_bool(0.002),
                speed: Some(speed),
                score: 1,
                gems: i64::from(rng.random_bool(0.01)),
                distance: f64::from(speed * SIM_DT),
                letters: if rng.random_bool(0.002) {
                    vec![rng.random_range(0..TARGET_LETTERS.len() as u8)]
                } else {
                    Vec::new()
                },
                level_cleared: t % LEVEL_LENGTH_TICKS == 0,
                damage: u32::from(rng.random_bool(0.0008)),
            };
            tick(&mut session, &input);

            if input.level_cleared {
                visit_shop(&mut session);
            }
        }

        if !session.status().is_terminal() {
            log::warn!("Demo stopped after {MAX_TICKS} ticks without finishing");
        }
        session.last_run().cloned()
    }

    /// Buy the cheapest affordable offers, then resume
    fn visit_shop(session: &mut Session) {
        if session.request_shop().is_err() {
            return;
        }
        let mut offers = session.offers().to_vec();
        offers.sort_by_key(|offer| offer.cost);
        for offer in offers {
            if let Err(err) = session.purchase(offer.kind, offer.cost) {
                log::debug!("Demo skipped {}: {err}", offer.kind);
            }
        }
        let _ = session.close_shop();
    }
}
