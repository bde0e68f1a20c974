//! 角色成長（任務獎勵與升級）
//!
//! 試煉勝利時由 `Trial` 透過 `RewardApplier` 呼叫；保存與讀取由外部負責。

use crate::constants::{
    EXP_BASE, EXP_MULTIPLIER, LEVEL_UP_BONUS_POINTS, MISSION_REWARD_EXP, MISSION_REWARD_POINTS,
};
use crate::entity::{CharacterProfile, ProgressionStats};
use crate::error::{ProgressionError, Result};
use crate::trial::RewardApplier;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// 可升級的屬性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Power,
    Defense,
    Agility,
    Magic,
}

/// 升到下一級所需經驗：floor(10 × level^1.5)
pub fn exp_for_next_level(level: u32) -> u32 {
    (EXP_BASE * f64::from(level).powf(EXP_MULTIPLIER)).floor() as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub stats: ProgressionStats,
    pub level: u32,
    pub exp: u32,
    pub upgrade_points: u32,
}

impl Progression {
    /// 新角色：1 級、0 經驗、0 點數
    pub fn new(stats: ProgressionStats) -> Self {
        Self {
            stats,
            level: 1,
            exp: 0,
            upgrade_points: 0,
        }
    }

    /// 開始試煉所需的角色資料
    pub fn profile(&self, name: &str, icon: &str) -> CharacterProfile {
        CharacterProfile {
            name: name.to_string(),
            icon: icon.to_string(),
            stats: self.stats,
        }
    }

    /// 完成任務：+1 點數、+5 經驗，經驗足夠時升一級
    pub fn complete_mission(&mut self) {
        self.upgrade_points += MISSION_REWARD_POINTS;
        self.exp += MISSION_REWARD_EXP;

        let needed = exp_for_next_level(self.level);
        if self.exp >= needed {
            self.level += 1;
            self.exp -= needed;
            self.upgrade_points += LEVEL_UP_BONUS_POINTS;
            log::info!("升級到 {} 級", self.level);
        }
    }

    /// 花一點升級點數提升一項屬性
    pub fn upgrade_stat(&mut self, stat: StatKind) -> Result<()> {
        if self.upgrade_points == 0 {
            return Err(ProgressionError::NoUpgradePoints.into());
        }
        self.upgrade_points -= 1;
        let field = match stat {
            StatKind::Power => &mut self.stats.power,
            StatKind::Defense => &mut self.stats.defense,
            StatKind::Agility => &mut self.stats.agility,
            StatKind::Magic => &mut self.stats.magic,
        };
        *field += 1;
        Ok(())
    }
}

impl RewardApplier for Progression {
    fn apply_mission_reward(&mut self) {
        self.complete_mission();
    }
}
