//! End-to-end session flows and invariants across the public API

use gemini_runner::consts::*;
use gemini_runner::sim::{
    CATALOG, ProgressError, PurchaseError, Session, SessionStatus, ShopItemKind, TickInput, tick,
};
use gemini_runner::{Language, RunOutcome, Settings};
use proptest::prelude::*;

fn playing(seed: u64) -> Session {
    let mut session = Session::new(seed);
    session.start_game().unwrap();
    session
}

/// Re-enter the shop until `item` is offered; leaves the session in SHOP
fn shop_offering(session: &mut Session, item: ShopItemKind) {
    for _ in 0..100 {
        session.request_shop().unwrap();
        if session.offers().iter().any(|o| o.kind == item) {
            return;
        }
        session.close_shop().unwrap();
    }
    panic!("{item} never offered");
}

fn idle_ticks(session: &mut Session, count: u64) {
    let idle = TickInput::default();
    for _ in 0..count {
        tick(session, &idle);
    }
}

#[test]
fn heal_at_full_lives_spends_credits() {
    let mut session = playing(2024);
    assert_eq!(session.player().lives(), 3);
    assert_eq!(session.player().max_lives(), 3);
    session.accrue_score(1000).unwrap();

    shop_offering(&mut session, ShopItemKind::Heal);
    assert!(session.offers().len() <= MAX_SHOP_OFFERS);

    let receipt = session.purchase(ShopItemKind::Heal, 1000).unwrap();
    assert_eq!(receipt.score_after, 0);
    assert_eq!(session.player().score(), 0);
    assert_eq!(session.player().lives(), 3);
}

#[test]
fn last_life_lost_ends_run() {
    let mut session = playing(7);
    session.apply_damage(2).unwrap();
    assert_eq!(session.player().lives(), 1);
    session.apply_damage(1).unwrap();
    assert_eq!(session.player().lives(), 0);
    assert_eq!(session.status(), SessionStatus::GameOver);
}

#[test]
fn immortality_locked_without_purchase() {
    let mut session = playing(7);
    assert_eq!(
        session.activate_immortality(),
        Err(ProgressError::AbilityLocked)
    );
    assert!(!session.player().is_immortality_active());
}

#[test]
fn immortality_window_closes_on_its_own() {
    let mut session = playing(31);
    session.accrue_score(3000).unwrap();
    shop_offering(&mut session, ShopItemKind::Immortal);
    session.purchase(ShopItemKind::Immortal, 3000).unwrap();
    session.close_shop().unwrap();

    session.activate_immortality().unwrap();
    assert!(session.player().is_immortality_active());
    idle_ticks(&mut session, IMMORTALITY_DURATION_TICKS - 1);
    assert!(session.player().is_immortality_active());
    idle_ticks(&mut session, 1);
    assert!(!session.player().is_immortality_active());
}

#[test]
fn shop_pauses_the_immortality_clock() {
    let mut session = playing(31);
    session.accrue_score(3000).unwrap();
    shop_offering(&mut session, ShopItemKind::Immortal);
    session.purchase(ShopItemKind::Immortal, 3000).unwrap();
    session.close_shop().unwrap();
    session.activate_immortality().unwrap();

    session.request_shop().unwrap();
    idle_ticks(&mut session, IMMORTALITY_DURATION_TICKS * 2);
    session.close_shop().unwrap();
    assert_eq!(
        session.player().immortality_ticks_remaining(),
        IMMORTALITY_DURATION_TICKS
    );
}

#[test]
fn restart_discards_old_timer() {
    let mut session = playing(99);
    session.accrue_score(3000).unwrap();
    shop_offering(&mut session, ShopItemKind::Immortal);
    session.purchase(ShopItemKind::Immortal, 3000).unwrap();
    session.close_shop().unwrap();
    session.activate_immortality().unwrap();
    let old_run = session.generation();

    idle_ticks(&mut session, IMMORTALITY_DURATION_TICKS);
    session.apply_damage(3).unwrap();
    session.restart_game().unwrap();

    assert!(matches!(
        session.expire_immortality(old_run),
        Err(ProgressError::StaleTimer { .. })
    ));
    assert_eq!(session.status(), SessionStatus::Playing);
    assert!(!session.player().has_immortality_ability());
}

#[test]
fn full_victory_run_and_restart() {
    let mut session = playing(5);
    session.accrue_score(2500).unwrap();
    session.accrue_gems(12).unwrap();
    session.accrue_distance(321.7).unwrap();
    for index in 0..TARGET_LETTERS.len() as u8 {
        session.collect_letter(index).unwrap();
    }
    session.advance_level().unwrap();
    session.request_shop().unwrap();
    session.close_shop().unwrap();
    session.advance_level().unwrap();
    assert_eq!(session.status(), SessionStatus::Victory);

    let run = session.last_run().unwrap().clone();
    assert_eq!(run.outcome, RunOutcome::Victory);
    assert_eq!(run.level, MAX_LEVEL);
    assert_eq!(run.distance, 321);
    assert_eq!(run.gems_collected, 12);
    assert_eq!(run.score, 2500);

    // Frozen until restarted
    assert!(session.collect_letter(0).is_err());
    assert!(session.request_shop().is_err());

    session.restart_game().unwrap();
    let p = session.player();
    assert_eq!(p.level(), 1);
    assert_eq!(p.score(), 0);
    assert_eq!(p.gems_collected(), 0);
    assert_eq!(p.distance(), 0.0);
    assert!(p.collected_letters().is_empty());
    assert!(!p.has_double_jump());
}

#[test]
fn language_survives_restart() {
    let settings = Settings {
        language: Language::Zh,
    };
    let mut session = Session::from_settings(3, &settings);
    session.start_game().unwrap();
    session.apply_damage(3).unwrap();
    session.restart_game().unwrap();
    assert_eq!(session.language(), Language::Zh);
    assert_eq!(session.snapshot().language, Language::Zh);
}

#[test]
fn stale_price_rejected() {
    let mut session = playing(8);
    session.accrue_score(5000).unwrap();
    shop_offering(&mut session, ShopItemKind::MaxLife);
    let err = session.purchase(ShopItemKind::MaxLife, 1000).unwrap_err();
    assert!(matches!(err, PurchaseError::PriceMismatch { cost: 1500, .. }));
    assert_eq!(session.player().max_lives(), 3);
    assert_eq!(session.player().score(), 5000);
}

#[test]
fn immortal_victory_ends_with_window_closed() {
    let mut session = playing(77);
    session.accrue_score(3000).unwrap();
    shop_offering(&mut session, ShopItemKind::Immortal);
    session.purchase(ShopItemKind::Immortal, 3000).unwrap();
    session.close_shop().unwrap();
    session.advance_level().unwrap();
    session.advance_level().unwrap();
    session.activate_immortality().unwrap();

    let finale = TickInput {
        letters: (0..TARGET_LETTERS.len() as u8).collect(),
        ..Default::default()
    };
    tick(&mut session, &finale);
    assert_eq!(session.status(), SessionStatus::Victory);

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["isImmortalityActive"], false);
    assert_eq!(json["hasImmortalityAbility"], true);
}

#[derive(Debug, Clone)]
enum Op {
    Damage(u32),
    Score(i64),
    Letter(u8),
    Level,
    Shop,
    CloseShop,
    Buy(usize),
    Ability,
    Ticks(u16),
    Restart,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..3).prop_map(Op::Damage),
        (-500i64..3000).prop_map(Op::Score),
        (0u8..8).prop_map(Op::Letter),
        Just(Op::Level),
        Just(Op::Shop),
        Just(Op::CloseShop),
        (0usize..4).prop_map(Op::Buy),
        Just(Op::Ability),
        (0u16..800).prop_map(Op::Ticks),
        Just(Op::Restart),
    ]
}

fn check_invariants(session: &Session) {
    let p = session.player();
    assert!(p.lives() <= p.max_lives());
    assert!(p.max_lives() >= BASE_MAX_LIVES);
    assert!((1..=MAX_LEVEL).contains(&p.level()));
    assert!(
        p.collected_letters()
            .iter()
            .all(|&i| usize::from(i) < TARGET_LETTERS.len())
    );
    if p.is_immortality_active() {
        assert!(p.has_immortality_ability());
    }
    if session.status().is_terminal() {
        assert!(!p.is_immortality_active());
    }
    assert!(session.offers().len() <= MAX_SHOP_OFFERS);
    if session.status() != SessionStatus::Shop {
        assert!(session.offers().is_empty());
    }
    for offer in session.offers() {
        assert!(!(offer.one_time && p.owns(offer.kind)));
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_any_event_sequence(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut session = playing(seed);
        for op in ops {
            let before_status = session.status();
            let before_lives = session.player().lives();
            let before_score = session.player().score();
            match op {
                Op::Damage(n) => {
                    let _ = session.apply_damage(n);
                    let lives = session.player().lives();
                    let ended = session.status() == SessionStatus::GameOver;
                    prop_assert_eq!(
                        ended && before_status == SessionStatus::Playing,
                        lives == 0 && before_lives > 0
                    );
                }
                Op::Score(d) => { let _ = session.accrue_score(d); }
                Op::Letter(i) => { let _ = session.collect_letter(i); }
                Op::Level => { let _ = session.advance_level(); }
                Op::Shop => { let _ = session.request_shop(); }
                Op::CloseShop => { let _ = session.close_shop(); }
                Op::Buy(i) => {
                    let item = CATALOG[i];
                    let had = session.player().owns(item.kind);
                    match session.purchase(item.kind, item.cost) {
                        Ok(receipt) => {
                            prop_assert_eq!(receipt.score_after, before_score - item.cost);
                            prop_assert_eq!(session.player().score(), before_score - item.cost);
                            if item.one_time {
                                prop_assert!(!had);
                                prop_assert!(session.player().owns(item.kind));
                            }
                        }
                        Err(_) => {
                            prop_assert_eq!(session.player().score(), before_score);
                        }
                    }
                }
                Op::Ability => { let _ = session.activate_immortality(); }
                Op::Ticks(n) => idle_ticks(&mut session, u64::from(n)),
                Op::Restart => { let _ = session.restart_game(); }
            }
            check_invariants(&session);
            if session.status() == SessionStatus::Victory && before_status == SessionStatus::Playing {
                let p = session.player();
                prop_assert!(p.has_all_letters());
                prop_assert_eq!(p.level(), MAX_LEVEL);
            }
        }
    }

    #[test]
    fn owned_one_time_items_never_offered_again(seed in any::<u64>()) {
        let mut session = playing(seed);
        session.accrue_score(10_000).unwrap();
        for _ in 0..30 {
            session.request_shop().unwrap();
            for offer in session.offers().to_vec() {
                if offer.one_time {
                    let _ = session.purchase(offer.kind, offer.cost);
                }
            }
            session.close_shop().unwrap();
        }
        for _ in 0..20 {
            session.request_shop().unwrap();
            for offer in session.offers() {
                prop_assert!(!(offer.one_time && session.player().owns(offer.kind)));
            }
            session.close_shop().unwrap();
        }
    }
}
