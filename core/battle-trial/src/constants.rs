//! 遊戲常數定義（`TrialConfig::default()` 的來源）

use crate::alias::{Coord, Hp, Millis, Stat};

/// 棋盤邊長（正方形）
pub const BOARD_SIZE: Coord = 5;

/// 英雄起始位置（底部中央）
pub const HERO_START: (Coord, Coord) = (2, 4);

/// 英雄基礎生命值
pub const HERO_BASE_HP: Hp = 50;

/// 每點防禦提供的生命值
pub const HERO_HP_PER_DEFENSE: Hp = 5;

/// 英雄單次移動距離上限
pub const HERO_MAX_MOVE: Coord = 2;

/// 敏捷換算移動距離的除數
pub const AGILITY_PER_MOVE: Stat = 3;

/// 近戰攻擊距離
pub const ATTACK_RANGE: Coord = 1;

/// 每個玩家回合的行動點數
pub const ACTION_POINTS_PER_TURN: u32 = 1;

/// 敵方生成數量範圍
pub const MIN_ADVERSARIES: usize = 1;
pub const MAX_ADVERSARIES: usize = 3;

/// 敵方生成位置（依生成順序取用）
pub const SPAWN_SLOTS: [(Coord, Coord); 5] = [(0, 0), (2, 0), (4, 0), (1, 1), (3, 1)];

/// 傷害浮動倍率（半開區間）
pub const VARIANCE_MIN: f64 = 0.8;
pub const VARIANCE_MAX: f64 = 1.2;

/// 防禦對傷害的減免係數
pub const DEFENSE_FACTOR: f64 = 0.5;

/// 防禦姿態下的防禦倍率
pub const DEFEND_MULTIPLIER: f64 = 1.5;

/// 施法：範圍傷害門檻與倍率
pub const AREA_SPELL_THRESHOLD: Stat = 7;
pub const AREA_SPELL_MULTIPLIER: Stat = 2;

/// 施法：自我治療門檻與倍率
pub const HEAL_SPELL_THRESHOLD: Stat = 4;
pub const HEAL_SPELL_MULTIPLIER: Stat = 3;

/// 進入敵方回合前的延遲（半拍）
pub const PHASE_START_DELAY: Millis = 500;

/// 敵方單位之間的延遲（一拍）
pub const ADVERSARY_ACTION_DELAY: Millis = 1000;

/// 回到玩家回合前的延遲
pub const PLAYER_RETURN_DELAY: Millis = 800;

/// 任務獎勵：升級點數
pub const MISSION_REWARD_POINTS: u32 = 1;

/// 任務獎勵：經驗值
pub const MISSION_REWARD_EXP: u32 = 5;

/// 升級額外點數
pub const LEVEL_UP_BONUS_POINTS: u32 = 3;

/// 升級經驗公式：floor(EXP_BASE * level ^ EXP_MULTIPLIER)
pub const EXP_BASE: f64 = 10.0;
pub const EXP_MULTIPLIER: f64 = 1.5;
