//! entity.rs：
//! - 定義英雄（Hero）、敵方原型（Archetype）與敵方單位（Adversary）等資料結構。
//! - 只負責屬性與衍生值（最大生命、移動距離），不負責戰鬥判定與回合流程。
use crate::alias::{AdversaryId, Coord, Hp, Stat};
use crate::board::Position;
use crate::config::TrialConfig;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// 外部進度系統保存的角色屬性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionStats {
    pub power: Stat,
    pub defense: Stat,
    pub agility: Stat,
    pub magic: Stat,
}

/// 開始試煉所需的角色資料（由角色目錄與進度系統提供）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub icon: String,
    pub stats: ProgressionStats,
}

/// 玩家控制的英雄
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub name: String,
    pub icon: String,
    pub position: Position,
    pub hp: Hp,
    pub max_hp: Hp,
    pub attack: Stat,
    pub defense: Stat,
    pub agility: Stat,
    pub magic: Stat,
    /// 防禦姿態，持續到英雄下一個回合開始
    pub defending: bool,
}

impl Hero {
    /// 由角色資料建立英雄
    ///
    /// 最大生命 = 基礎生命 + 防禦 × 每點防禦生命，其餘屬性一對一對應。
    pub fn from_profile(profile: &CharacterProfile, config: &TrialConfig) -> Self {
        let stats = profile.stats;
        let max_hp = config
            .hero
            .base_hp
            .saturating_add(stats.defense.saturating_mul(config.hero.hp_per_defense));
        Self {
            name: profile.name.clone(),
            icon: profile.icon.clone(),
            position: config.hero.start,
            hp: max_hp,
            max_hp,
            attack: stats.power,
            defense: stats.defense,
            agility: stats.agility,
            magic: stats.magic,
            defending: false,
        }
    }

    /// 單次移動可走的最大曼哈頓距離：min(floor(敏捷 / 除數) + 1, 上限)
    pub fn move_range(&self, config: &TrialConfig) -> Coord {
        let divisor = config.hero.agility_per_move.max(1);
        let steps = self.agility.div_euclid(divisor) + 1;
        let steps = Coord::try_from(steps).unwrap_or(0);
        steps.min(config.hero.max_move)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// 敵方行為傾向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Behavior {
    Aggressive,
    Defensive,
    Mobile,
}

/// 攻擊類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttackStyle {
    Physical,
    Magical,
}

/// 原型的基礎屬性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: Hp,
    pub attack: Stat,
    pub defense: Stat,
    pub agility: Stat,
}

/// 敵方原型（模板）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// 原型鍵值（fire / stone / wind）
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub behavior: Behavior,
    pub style: AttackStyle,
    pub base: BaseStats,
}

/// 試煉中的敵方單位
///
/// 生成後原型不變，只有位置與生命會改變。生命 <= 0 視為被擊敗，紀錄保留以供顯示。
#[derive(Debug, Clone, PartialEq)]
pub struct Adversary {
    pub id: AdversaryId,
    pub archetype: Archetype,
    pub position: Position,
    pub hp: Hp,
    pub max_hp: Hp,
    pub attack: Stat,
    pub defense: Stat,
    pub agility: Stat,
}

impl Adversary {
    /// 依原型生成，基礎屬性原樣複製
    pub fn spawn(id: AdversaryId, archetype: &Archetype, position: Position) -> Self {
        let base = archetype.base;
        Self {
            id,
            archetype: archetype.clone(),
            position,
            hp: base.hp,
            max_hp: base.hp,
            attack: base.attack,
            defense: base.defense,
            agility: base.agility,
        }
    }

    pub fn name(&self) -> &str {
        &self.archetype.name
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
