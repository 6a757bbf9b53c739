//! Fixed timestep simulation tick
//!
//! Folds one tick's worth of input intents and simulation reports into the session.

use super::session::Session;
use super::state::{GameEvent, SessionStatus};

/// Everything that happened during a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    // === Player intents ===
    /// Shift one lane left
    pub move_left: bool,
    /// Shift one lane right
    pub move_right: bool,
    /// Jump (second press mid-air needs double jump)
    pub jump: bool,
    /// Trigger the immortality ability
    pub activate_ability: bool,

    // === Reports from the runner simulation ===
    /// Runner is touching the ground this tick
    pub grounded: bool,
    /// Current run speed
    pub speed: Option<f32>,
    pub score: i64,
    pub gems: i64,
    pub distance: f64,
    /// Letter indices picked up this tick
    pub letters: Vec<u8>,
    /// The runner crossed a level boundary
    pub level_cleared: bool,
    /// Damage from obstacle collisions
    pub damage: u32,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    // Menu, shop and end screens freeze the run
    if session.status() != SessionStatus::Playing {
        return;
    }

    if let Some(speed) = input.speed {
        session.set_speed(speed);
    }

    if session.player_mut().advance_clock() {
        session.push_event(GameEvent::ImmortalityEnded);
    }

    // Movement
    {
        let player = session.player_mut();
        let has_double_jump = player.has_double_jump;
        let runner = &mut player.runner;
        if input.move_left {
            runner.move_left();
        }
        if input.move_right {
            runner.move_right();
        }
        if input.grounded {
            runner.land();
        }
        if input.jump && runner.try_jump(has_double_jump) {
            let double = runner.jumps_used > 1;
            session.push_event(GameEvent::Jumped { double });
        }
    }

    if input.activate_ability {
        if let Err(err) = session.activate_immortality() {
            log::debug!("Ability not activated: {err}");
        }
    }

    {
        let player = session.player_mut();
        player.accrue_score(input.score);
        player.accrue_gems(input.gems);
        player.accrue_distance(input.distance);
    }

    // A letter can end the run, after which later reports in this tick are dropped
    for &index in &input.letters {
        if let Err(err) = session.collect_letter(index) {
            log::debug!("Letter {index} dropped: {err}");
        }
    }

    if input.level_cleared {
        if let Err(err) = session.advance_level() {
            log::debug!("Level clear dropped: {err}");
        }
    }

    if input.damage > 0 {
        if let Err(err) = session.apply_damage(input.damage) {
            log::debug!("Damage {} dropped: {err}", input.damage);
        }
    }
}
