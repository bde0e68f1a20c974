//! 戰鬥狀態（聚合根）
//!
//! 只有 `Trial` 能修改；渲染端透過 `Trial::state()` 取得唯讀參考。

use crate::alias::AdversaryId;
use crate::board::Board;
use crate::entity::{Adversary, Hero};
use strum_macros::Display;

/// 試煉結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// 回合階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerTurn,
    AdversaryPhase,
    Over(Outcome),
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub hero: Hero,
    /// 依編號排序；被擊敗的敵方保留紀錄
    pub adversaries: Vec<Adversary>,
    pub board: Board,
    pub phase: Phase,
    pub action_points: u32,
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == Phase::PlayerTurn
    }

    pub fn is_defending(&self) -> bool {
        self.hero.defending
    }

    pub fn adversary(&self, id: AdversaryId) -> Option<&Adversary> {
        self.adversaries.iter().find(|a| a.id == id)
    }

    pub(crate) fn adversary_mut(&mut self, id: AdversaryId) -> Option<&mut Adversary> {
        self.adversaries.iter_mut().find(|a| a.id == id)
    }

    /// 存活的敵方（依編號順序）
    pub fn living_adversaries(&self) -> impl Iterator<Item = &Adversary> + '_ {
        self.adversaries.iter().filter(|a| a.is_alive())
    }

    pub fn all_adversaries_defeated(&self) -> bool {
        self.adversaries.iter().all(|a| !a.is_alive())
    }
}
