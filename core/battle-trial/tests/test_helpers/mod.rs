//! 測試輔助：ASCII 佈局建立試煉、事件紀錄器與獎勵計數器
#![allow(dead_code)]

use battle_trial::entity::{AttackStyle, BaseStats, Behavior};
use battle_trial::{
    Archetype, BattleEvent, BattleObserver, BattleState, CharacterProfile, Phase,
    ProgressionStats, RewardApplier, Trial, TrialConfig, TrialSetup,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const SEED: u64 = 20240607;

pub fn profile(power: i32, defense: i32, agility: i32, magic: i32) -> CharacterProfile {
    CharacterProfile {
        name: "Gatotkaca".to_string(),
        icon: "⚔️".to_string(),
        stats: ProgressionStats {
            power,
            defense,
            agility,
            magic,
        },
    }
}

/// 生命 10、攻擊 1 的弱小原型，方便測試範圍法術
pub fn config_with_wisp() -> TrialConfig {
    let mut config = TrialConfig::default();
    config.archetypes.push(Archetype {
        key: "wisp".to_string(),
        name: "Roh Kecil".to_string(),
        icon: "✨".to_string(),
        color: "#FACC15".to_string(),
        behavior: Behavior::Mobile,
        style: AttackStyle::Magical,
        base: BaseStats {
            hp: 10,
            attack: 1,
            defense: 0,
            agility: 1,
        },
    });
    config
}

/// 事件發生當下的狀態摘要
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub event: BattleEvent,
    pub phase: Phase,
    pub action_points: u32,
    pub hero_hp: i32,
}

pub type EventLog = Rc<RefCell<Vec<Recorded>>>;

pub struct Recorder(EventLog);

impl BattleObserver for Recorder {
    fn notify(&mut self, event: &BattleEvent, state: &BattleState) {
        self.0.borrow_mut().push(Recorded {
            event: event.clone(),
            phase: state.phase,
            action_points: state.action_points,
            hero_hp: state.hero.hp,
        });
    }
}

/// 記錄獎勵被套用的次數
pub struct CountingReward(pub Rc<Cell<u32>>);

impl RewardApplier for CountingReward {
    fn apply_mission_reward(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

pub struct Harness {
    pub trial: Trial,
    pub log: EventLog,
    pub rewards: Rc<Cell<u32>>,
}

impl Harness {
    /// 目前為止的事件（不含訂閱時的 TrialStarted）
    pub fn events(&self) -> Vec<BattleEvent> {
        self.log
            .borrow()
            .iter()
            .skip(1)
            .map(|r| r.event.clone())
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().truncate(1);
    }
}

pub fn harness_with_config(
    profile: CharacterProfile,
    layout: &str,
    config: TrialConfig,
) -> Harness {
    let setup = TrialSetup::from_layout(profile, layout).expect("佈局應有效");
    let rewards = Rc::new(Cell::new(0));
    let mut trial = Trial::from_setup(
        setup,
        config,
        StdRng::seed_from_u64(SEED),
        Box::new(CountingReward(rewards.clone())),
    )
    .expect("from_setup 應成功");

    let log = EventLog::default();
    trial.subscribe(Box::new(Recorder(log.clone())));
    Harness {
        trial,
        log,
        rewards,
    }
}

pub fn harness(profile: CharacterProfile, layout: &str) -> Harness {
    harness_with_config(profile, layout, TrialConfig::default())
}
