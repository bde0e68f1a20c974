//! 試煉設定
//!
//! 預設值即原始遊戲的數值；TOML 只需寫出要覆寫的欄位。

use crate::alias::{Coord, Hp, Millis, Stat};
use crate::board::Position;
use crate::constants::*;
use crate::entity::{Archetype, AttackStyle, BaseStats, Behavior};
use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};

/// 棋盤尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_SIZE,
            height: BOARD_SIZE,
        }
    }
}

/// 英雄衍生屬性規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub start: Position,
    pub base_hp: Hp,
    pub hp_per_defense: Hp,
    pub max_move: Coord,
    pub agility_per_move: Stat,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            start: HERO_START.into(),
            base_hp: HERO_BASE_HP,
            hp_per_defense: HERO_HP_PER_DEFENSE,
            max_move: HERO_MAX_MOVE,
            agility_per_move: AGILITY_PER_MOVE,
        }
    }
}

/// 敵方生成規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub min: usize,
    pub max: usize,
    /// 依生成順序取用，數量超過時循環
    pub slots: Vec<Position>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min: MIN_ADVERSARIES,
            max: MAX_ADVERSARIES,
            slots: SPAWN_SLOTS.iter().map(|&slot| slot.into()).collect(),
        }
    }
}

/// 傷害公式係數
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub variance_min: f64,
    pub variance_max: f64,
    pub defense_factor: f64,
    pub defend_multiplier: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            variance_min: VARIANCE_MIN,
            variance_max: VARIANCE_MAX,
            defense_factor: DEFENSE_FACTOR,
            defend_multiplier: DEFEND_MULTIPLIER,
        }
    }
}

/// 施法門檻與倍率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    pub area_threshold: Stat,
    pub area_multiplier: Stat,
    pub heal_threshold: Stat,
    pub heal_multiplier: Stat,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            area_threshold: AREA_SPELL_THRESHOLD,
            area_multiplier: AREA_SPELL_MULTIPLIER,
            heal_threshold: HEAL_SPELL_THRESHOLD,
            heal_multiplier: HEAL_SPELL_MULTIPLIER,
        }
    }
}

/// 敵方回合節奏（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub phase_start_delay: Millis,
    pub adversary_action_delay: Millis,
    pub player_return_delay: Millis,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            phase_start_delay: PHASE_START_DELAY,
            adversary_action_delay: ADVERSARY_ACTION_DELAY,
            player_return_delay: PLAYER_RETURN_DELAY,
        }
    }
}

/// 完整試煉設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    pub board: BoardConfig,
    pub hero: HeroConfig,
    pub spawn: SpawnConfig,
    pub combat: CombatConfig,
    pub spells: SpellConfig,
    pub pacing: PacingConfig,
    pub archetypes: Vec<Archetype>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            hero: HeroConfig::default(),
            spawn: SpawnConfig::default(),
            combat: CombatConfig::default(),
            spells: SpellConfig::default(),
            pacing: PacingConfig::default(),
            archetypes: default_archetypes(),
        }
    }
}

impl TrialConfig {
    /// 反序列化 TOML 設定並驗證
    pub fn from_toml(config_toml: &str) -> Result<Self> {
        let config: TrialConfig =
            toml::from_str(config_toml).map_err(|e| LoadError::DeserializeError {
                format: "trial.toml".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 依鍵值取得原型
    pub fn archetype(&self, key: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.key == key)
    }

    /// 檢查設定能否組成合法的試煉
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |reason: String| -> Result<()> { Err(LoadError::InvalidConfig(reason).into()) };

        let in_board = |pos: Position| pos.x < self.board.width && pos.y < self.board.height;

        if self.board.width == 0 || self.board.height == 0 {
            return invalid("棋盤尺寸不可為 0".to_string());
        }
        if !in_board(self.hero.start) {
            return invalid(format!("英雄起始位置 {} 不在棋盤內", self.hero.start));
        }
        if self.archetypes.is_empty() {
            return invalid("敵方原型不可為空".to_string());
        }
        if self.spawn.slots.is_empty() {
            return invalid("生成位置不可為空".to_string());
        }
        if self.spawn.min == 0 {
            return invalid("生成數量下限至少為 1".to_string());
        }
        if self.spawn.min > self.spawn.max {
            return invalid(format!(
                "生成數量下限 {} 大於上限 {}",
                self.spawn.min, self.spawn.max
            ));
        }
        if self.spawn.max > self.spawn.slots.len() {
            return invalid(format!(
                "生成數量上限 {} 超過生成位置數 {}",
                self.spawn.max,
                self.spawn.slots.len()
            ));
        }
        if let Some(slot) = self.spawn.slots.iter().find(|&&slot| !in_board(slot)) {
            return invalid(format!("生成位置 {slot} 不在棋盤內"));
        }
        if self.spawn.slots.contains(&self.hero.start) {
            return invalid(format!("生成位置與英雄起始位置 {} 重疊", self.hero.start));
        }
        if !(self.combat.variance_min <= self.combat.variance_max) {
            return invalid(format!(
                "浮動倍率下限 {} 大於上限 {}",
                self.combat.variance_min, self.combat.variance_max
            ));
        }
        Ok(())
    }
}

/// 三種原型：火（攻擊型/物理）、石（防禦型/物理）、風（機動型/魔法）
pub fn default_archetypes() -> Vec<Archetype> {
    vec![
        Archetype {
            key: "fire".to_string(),
            name: "Roh Api".to_string(),
            icon: "🔥".to_string(),
            color: "#EF4444".to_string(),
            behavior: Behavior::Aggressive,
            style: AttackStyle::Physical,
            base: BaseStats {
                hp: 30,
                attack: 8,
                defense: 3,
                agility: 5,
            },
        },
        Archetype {
            key: "stone".to_string(),
            name: "Roh Batu".to_string(),
            icon: "🪨".to_string(),
            color: "#78716C".to_string(),
            behavior: Behavior::Defensive,
            style: AttackStyle::Physical,
            base: BaseStats {
                hp: 50,
                attack: 5,
                defense: 10,
                agility: 2,
            },
        },
        Archetype {
            key: "wind".to_string(),
            name: "Roh Angin".to_string(),
            icon: "💨".to_string(),
            color: "#06B6D4".to_string(),
            behavior: Behavior::Mobile,
            style: AttackStyle::Magical,
            base: BaseStats {
                hp: 25,
                attack: 6,
                defense: 4,
                agility: 8,
            },
        },
    ]
}
