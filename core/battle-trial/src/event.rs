//! 戰鬥事件與觀察者
//!
//! 每次狀態變更後發出一個事件，觀察者同時收到事件與變更後的狀態。
//! 被拒絕的行動不發出事件。

use crate::alias::{AdversaryId, Hp};
use crate::board::{Occupant, Position};
use crate::logic::combat::SpellEffect;
use crate::state::{BattleState, Outcome, Phase};

#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TrialStarted {
        adversaries: usize,
    },
    HeroMoved {
        from: Position,
        to: Position,
    },
    AttackResolved {
        attacker: Occupant,
        target: Occupant,
        damage: Hp,
        remaining_hp: Hp,
    },
    AdversaryDefeated {
        id: AdversaryId,
    },
    /// 範圍法術的 `damage` 為每個目標受到的傷害；治療的 `amount` 為實際回復量
    SpellCast {
        effect: SpellEffect,
    },
    HeroDefended,
    AdversaryMoved {
        id: AdversaryId,
        from: Position,
        to: Position,
    },
    /// 前進方向被擋住，本次行動原地不動
    AdversaryHeld {
        id: AdversaryId,
    },
    PhaseChanged {
        phase: Phase,
    },
    TrialEnded {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// 戰鬥訊息列顯示的文字
    pub fn message(&self, state: &BattleState) -> String {
        let hero = state.hero.name.as_str();
        let name_of = |occupant: Occupant| match occupant {
            Occupant::Hero => hero.to_string(),
            Occupant::Adversary(id) => adversary_name(state, id),
        };

        match self {
            BattleEvent::TrialStarted { adversaries } => {
                format!("{hero} 進入試煉，{adversaries} 個靈體現身！")
            }
            BattleEvent::HeroMoved { to, .. } => format!("{hero} 移動到 {to}"),
            BattleEvent::AttackResolved {
                attacker: Occupant::Hero,
                target,
                damage,
                ..
            } => format!("{hero} 攻擊 {}，造成 {damage} 點傷害！", name_of(*target)),
            BattleEvent::AttackResolved {
                attacker, damage, ..
            } => format!("{} 發動攻擊！造成 {damage} 點傷害！", name_of(*attacker)),
            BattleEvent::AdversaryDefeated { id } => {
                format!("{} 已被擊敗！", adversary_name(state, *id))
            }
            BattleEvent::SpellCast {
                effect: SpellEffect::Area { damage },
            } => format!("範圍法術！所有靈體受到 {damage} 點傷害！"),
            BattleEvent::SpellCast {
                effect: SpellEffect::Heal { amount },
            } => format!("治療！回復 {amount} 點生命。"),
            BattleEvent::HeroDefended => format!("{hero} 進入防禦姿態！防禦提升 50%"),
            BattleEvent::AdversaryMoved { id, .. } => {
                format!("{} 逼近中...", adversary_name(state, *id))
            }
            BattleEvent::AdversaryHeld { id } => {
                format!("{} 被擋住了，原地不動", adversary_name(state, *id))
            }
            BattleEvent::PhaseChanged {
                phase: Phase::PlayerTurn,
            } => "輪到你了！".to_string(),
            BattleEvent::PhaseChanged {
                phase: Phase::AdversaryPhase,
            } => "靈體的回合...".to_string(),
            BattleEvent::PhaseChanged {
                phase: Phase::Over(_),
            } => "試煉結束".to_string(),
            BattleEvent::TrialEnded {
                outcome: Outcome::Victory,
            } => "🎉 勝利！你擊敗了所有靈體！".to_string(),
            BattleEvent::TrialEnded {
                outcome: Outcome::Defeat,
            } => "💀 戰敗！你被擊倒了...".to_string(),
        }
    }
}

fn adversary_name(state: &BattleState, id: AdversaryId) -> String {
    state
        .adversary(id)
        .map(|a| a.name().to_string())
        .unwrap_or_else(|| Occupant::Adversary(id).to_string())
}

/// 戰鬥事件的訂閱者
pub trait BattleObserver {
    fn notify(&mut self, event: &BattleEvent, state: &BattleState);
}

impl<F> BattleObserver for F
where
    F: FnMut(&BattleEvent, &BattleState),
{
    fn notify(&mut self, event: &BattleEvent, state: &BattleState) {
        self(event, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::TrialConfig;
    use crate::entity::{Adversary, CharacterProfile, Hero, ProgressionStats};

    fn sample_state() -> BattleState {
        let config = TrialConfig::default();
        let profile = CharacterProfile {
            name: "Arjuna".to_string(),
            icon: "🏹".to_string(),
            stats: ProgressionStats::default(),
        };
        let stone = config.archetype("stone").unwrap();
        BattleState {
            hero: Hero::from_profile(&profile, &config),
            adversaries: vec![Adversary::spawn(0, stone, Position::new(2, 0))],
            board: Board::new(5, 5),
            phase: Phase::PlayerTurn,
            action_points: 1,
        }
    }

    #[test]
    fn test_messages_use_names() {
        let state = sample_state();
        let test_data = [
            (
                BattleEvent::AttackResolved {
                    attacker: Occupant::Hero,
                    target: Occupant::Adversary(0),
                    damage: 4,
                    remaining_hp: 46,
                },
                "Arjuna 攻擊 Roh Batu，造成 4 點傷害！",
            ),
            (
                BattleEvent::AttackResolved {
                    attacker: Occupant::Adversary(0),
                    target: Occupant::Hero,
                    damage: 2,
                    remaining_hp: 48,
                },
                "Roh Batu 發動攻擊！造成 2 點傷害！",
            ),
            (
                BattleEvent::AdversaryDefeated { id: 0 },
                "Roh Batu 已被擊敗！",
            ),
            (
                BattleEvent::AdversaryHeld { id: 9 },
                "adversary-9 被擋住了，原地不動",
            ),
            (
                BattleEvent::SpellCast {
                    effect: SpellEffect::Heal { amount: 12 },
                },
                "治療！回復 12 點生命。",
            ),
        ];
        for (event, expected) in test_data {
            assert_eq!(event.message(&state), expected);
        }
    }

    #[test]
    fn test_closure_observer() {
        let state = sample_state();
        let mut seen = Vec::new();
        {
            let mut observer = |event: &BattleEvent, _: &BattleState| seen.push(event.clone());
            observer.notify(&BattleEvent::HeroDefended, &state);
        }
        assert_eq!(seen, vec![BattleEvent::HeroDefended]);
    }
}
