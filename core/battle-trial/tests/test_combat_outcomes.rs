mod test_helpers;

use battle_trial::error::{ActionError, ErrorKind};
use battle_trial::logic::combat::SpellEffect;
use battle_trial::{
    BattleEvent, BattleState, Occupant, Outcome, Phase, Position, Progression, ProgressionStats,
    Trial, TrialConfig, TrialSetup,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use test_helpers::*;

#[test]
fn test_attack_until_victory() {
    // 英雄防禦 10（生命 100），相鄰石之靈（生命 50、攻擊 5、防禦 10）
    let mut h = harness(
        profile(8, 10, 5, 1),
        r#"
. . .     . .
. . .     . .
. . .     . .
. . stone . .
. . H     . .
        "#,
    );

    let mut rounds = 0;
    while !h.trial.state().is_over() {
        rounds += 1;
        assert!(rounds <= 50, "每次至少 1 點傷害，50 回合內必勝");
        let before = h.trial.state().adversary(0).unwrap().hp;
        h.trial.attack(0).expect("攻擊應成功");
        let after = h.trial.state().adversary(0).unwrap().hp;
        // floor(8 × 0.8..1.2 − 5)
        assert!((1..=4).contains(&(before - after)), "{before} -> {after}");
        h.trial.run_until_idle();
    }

    let state = h.trial.state();
    assert_eq!(state.outcome(), Some(Outcome::Victory));
    assert_eq!(state.adversary(0).unwrap().hp, 0);
    assert!(state.board.is_empty(Position::new(2, 3)));
    assert_eq!(state.board.occupied().count(), 1);
    // 擊敗最後一個敵方的攻擊不消耗行動點數
    assert_eq!(state.action_points, 1);
    assert_eq!(h.rewards.get(), 1);
    assert_eq!(h.trial.pending_steps(), 0);

    let events = h.events();
    let n = events.len();
    assert_eq!(events[n - 2], BattleEvent::AdversaryDefeated { id: 0 });
    assert_eq!(
        events[n - 1],
        BattleEvent::TrialEnded {
            outcome: Outcome::Victory
        }
    );
}

#[test]
fn test_victory_applies_reward_before_final_event() {
    let progression = Rc::new(RefCell::new(Progression::new(ProgressionStats {
        power: 50,
        defense: 5,
        agility: 5,
        magic: 1,
    })));
    let profile = progression.borrow().profile("Bima", "💪");
    let setup = TrialSetup::from_layout(
        profile,
        r#"
. . .    . .
. . .    . .
. . .    . .
. . fire . .
. . H    . .
        "#,
    )
    .expect("佈局應有效");
    let mut trial = Trial::from_setup(
        setup,
        TrialConfig::default(),
        StdRng::seed_from_u64(SEED),
        Box::new(progression.clone()),
    )
    .expect("from_setup 應成功");

    let seen_at_end = Rc::new(Cell::new(None));
    let observer_progression = progression.clone();
    let observer_seen = seen_at_end.clone();
    trial.subscribe(Box::new(move |event: &BattleEvent, _: &BattleState| {
        if matches!(event, BattleEvent::TrialEnded { .. }) {
            observer_seen.set(Some(observer_progression.borrow().exp));
        }
    }));

    // 攻擊 50：一擊擊敗火之靈（生命 30）
    trial.attack(0).expect("攻擊應成功");
    assert_eq!(trial.state().outcome(), Some(Outcome::Victory));
    assert_eq!(seen_at_end.get(), Some(5));

    let progression = progression.borrow();
    assert_eq!(progression.exp, 5);
    assert_eq!(progression.upgrade_points, 1);
}

#[test]
fn test_area_cast_wins_in_one_action() {
    let mut h = harness_with_config(
        profile(1, 5, 5, 8),
        r#"
wisp . . . wisp
.    . . . .
.    . . . .
.    . . . .
.    . H . .
        "#,
        config_with_wisp(),
    );

    h.trial.cast().expect("範圍法術應成功");

    let state = h.trial.state();
    assert_eq!(state.phase, Phase::Over(Outcome::Victory));
    assert!(state.adversaries.iter().all(|a| a.hp == 0));
    assert_eq!(state.board.occupied().count(), 1);
    assert_eq!(state.action_points, 0);
    assert_eq!(h.trial.pending_steps(), 0);
    assert_eq!(h.rewards.get(), 1);
    assert_eq!(
        h.events(),
        vec![
            BattleEvent::SpellCast {
                effect: SpellEffect::Area { damage: 16 }
            },
            BattleEvent::AdversaryDefeated { id: 0 },
            BattleEvent::AdversaryDefeated { id: 1 },
            BattleEvent::TrialEnded {
                outcome: Outcome::Victory
            },
        ]
    );
}

#[test]
fn test_area_cast_partial_then_attack_defeated_target() {
    let mut h = harness_with_config(
        profile(1, 5, 5, 8),
        r#"
. . .     . .
. . .     . .
. . stone . .
. . wisp  . .
. . H     . .
        "#,
        config_with_wisp(),
    );

    h.trial.cast().expect("範圍法術應成功");
    {
        let state = h.trial.state();
        assert_eq!(state.adversary(0).unwrap().hp, 50 - 16);
        assert_eq!(state.adversary(1).unwrap().hp, 0);
        assert!(state.board.is_empty(Position::new(2, 3)));
        assert_eq!(state.phase, Phase::AdversaryPhase);
    }
    h.trial.run_until_idle();

    // 被擊敗的敵方不再行動：只有石之靈前進
    let moved: Vec<_> = h
        .events()
        .into_iter()
        .filter_map(|e| match e {
            BattleEvent::AdversaryMoved { id, to, .. } => Some((id, to)),
            _ => None,
        })
        .collect();
    assert_eq!(moved, vec![(0, Position::new(2, 3))]);
    assert_eq!(h.rewards.get(), 0);

    let err = h.trial.attack(1).expect_err("已擊敗的目標應被拒絕");
    assert!(matches!(
        err.kind(),
        ErrorKind::Action(ActionError::TargetDefeated { id: 1 })
    ));
    assert_eq!(h.trial.state().action_points, 1);
}

#[test]
fn test_weak_magic_is_rejected() {
    let mut h = harness(
        profile(5, 5, 5, 2),
        r#"
fire . . . .
.    . . . .
.    . . . .
.    . . . .
.    . H . .
        "#,
    );
    let before = h.trial.state().clone();

    let err = h.trial.cast().expect_err("魔力 2 應施法失敗");
    assert!(matches!(
        err.kind(),
        ErrorKind::Action(ActionError::MagicTooWeak { magic: 2 })
    ));

    let after = h.trial.state();
    assert_eq!(after.action_points, 1);
    assert_eq!(after.phase, Phase::PlayerTurn);
    assert_eq!(after.hero, before.hero);
    assert_eq!(after.adversaries, before.adversaries);
    assert!(h.events().is_empty());
}

#[test]
fn test_heal_clamps_to_max() {
    let mut h = harness(
        profile(5, 0, 5, 5),
        r#"
. . .    . .
. . .    . .
. . .    . .
. . fire . .
. . H    . .
        "#,
    );
    h.trial.defend().expect("防禦應成功");
    h.trial.run_until_idle();
    let wounded = h.trial.state().hero.hp;
    let lost = 50 - wounded;
    // 防禦 0：floor(8 × 0.8..1.2)
    assert!((6..=9).contains(&lost));

    h.clear_log();
    h.trial.cast().expect("治療應成功");
    assert_eq!(h.trial.state().hero.hp, 50);
    assert_eq!(
        h.events()[0],
        BattleEvent::SpellCast {
            effect: SpellEffect::Heal { amount: lost }
        }
    );
    assert_eq!(h.trial.state().phase, Phase::AdversaryPhase);
}

#[test]
fn test_attack_target_checks() {
    let mut h = harness(
        profile(5, 5, 5, 5),
        r#"
fire . . . .
.    . . . .
.    . . . .
.    . . . .
.    . H . .
        "#,
    );

    let err = h.trial.attack(0).expect_err("距離太遠應失敗");
    assert!(matches!(
        err.kind(),
        ErrorKind::Action(ActionError::TargetOutOfReach { id: 0, distance: 6 })
    ));
    let err = h.trial.attack(7).expect_err("不存在的目標應失敗");
    assert!(matches!(
        err.kind(),
        ErrorKind::Action(ActionError::UnknownTarget { id: 7 })
    ));
    assert_eq!(h.trial.state().adversary(0).unwrap().hp, 30);
    assert_eq!(h.trial.state().action_points, 1);
    assert!(h.events().is_empty());
}

#[test]
fn test_defeat_halts_remaining_adversaries() {
    let mut config = TrialConfig::default();
    config.hero.base_hp = 1;
    let mut h = harness_with_config(
        profile(5, 0, 5, 1),
        r#"
. .    .    . .
. .    .    . .
. .    .    . .
. .    fire . .
. fire H    . .
        "#,
        config,
    );
    assert_eq!(h.trial.state().hero.hp, 1);

    h.trial.defend().expect("防禦應成功");
    h.clear_log();
    // 開始 + 第一個敵方；第二個敵方不再行動
    assert_eq!(h.trial.run_until_idle(), 2);

    let state = h.trial.state();
    assert_eq!(state.phase, Phase::Over(Outcome::Defeat));
    assert_eq!(state.hero.hp, 0);
    assert_eq!(h.rewards.get(), 0);
    assert_eq!(h.trial.pending_steps(), 0);

    let events = h.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        BattleEvent::AttackResolved {
            attacker: Occupant::Adversary(0),
            target: Occupant::Hero,
            remaining_hp: 0,
            ..
        }
    ));
    assert_eq!(
        events[1],
        BattleEvent::TrialEnded {
            outcome: Outcome::Defeat
        }
    );

    // 結束後不接受任何行動，時間推進也不再執行
    let err = h.trial.defend().expect_err("試煉結束後應拒絕");
    assert!(matches!(err.kind(), ErrorKind::Action(ActionError::TrialOver)));
    assert_eq!(h.trial.advance(10_000), 0);
    assert_eq!(h.events().len(), 2);
}

#[test]
fn test_new_trial_replaces_previous() {
    let mut h = harness(
        profile(50, 5, 5, 1),
        r#"
. . .    . .
. . .    . .
. . .    . .
. . fire . .
. . H    . .
        "#,
    );
    h.trial.attack(0).expect("攻擊應成功");
    assert!(h.trial.state().is_over());

    let again = harness(
        profile(50, 5, 5, 1),
        r#"
. . .    . .
. . .    . .
. . .    . .
. . fire . .
. . H    . .
        "#,
    );
    assert!(!again.trial.state().is_over());
    assert_eq!(again.trial.state().adversary(0).unwrap().hp, 30);
    assert_eq!(again.rewards.get(), 0);
}
