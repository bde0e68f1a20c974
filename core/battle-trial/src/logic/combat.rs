//! combat.rs：
//! - 傷害、治療與施法效果的數值公式。
//! - 只做計算，不碰棋盤也不判定回合；浮動倍率由呼叫端傳入的亂數源產生。
use crate::alias::{Hp, Stat};
use crate::board::{distance, Position};
use crate::config::{CombatConfig, SpellConfig};
use crate::constants::ATTACK_RANGE;

/// 攻擊判定 context，防禦姿態由呼叫端決定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeContext {
    pub attack: Stat,
    pub defense: Stat,
    pub defending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrikeResult {
    pub damage: Hp,
    pub variance: f64,
    pub detail: String,
}

/// 施法結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEffect {
    /// 對所有存活敵方造成傷害
    Area { damage: Hp },
    /// 治療英雄自身
    Heal { amount: Hp },
}

/// 兩者是否在近戰距離內
pub fn in_attack_range(a: Position, b: Position) -> bool {
    distance(a, b) <= ATTACK_RANGE
}

/// 在 [variance_min, variance_max) 之間取浮動倍率
pub fn roll_variance<R: rand::Rng>(combat: &CombatConfig, rng: &mut R) -> f64 {
    if combat.variance_min < combat.variance_max {
        rng.random_range(combat.variance_min..combat.variance_max)
    } else {
        combat.variance_min
    }
}

/// 物理傷害：max(1, floor(攻擊 × 浮動 − 防禦 × 係數 × 姿態倍率))
pub fn physical_damage(ctx: &StrikeContext, variance: f64, combat: &CombatConfig) -> Hp {
    let stance = if ctx.defending {
        combat.defend_multiplier
    } else {
        1.0
    };
    let mitigation = f64::from(ctx.defense) * combat.defense_factor * stance;
    let raw = (f64::from(ctx.attack) * variance - mitigation).floor();
    // 浮點轉整數會飽和，不會溢位
    (raw as Hp).max(1)
}

/// 每次攻擊只骰一次浮動倍率
pub fn resolve_strike<R: rand::Rng>(
    ctx: &StrikeContext,
    combat: &CombatConfig,
    rng: &mut R,
) -> StrikeResult {
    let variance = roll_variance(combat, rng);
    let damage = physical_damage(ctx, variance, combat);
    StrikeResult {
        damage,
        variance,
        detail: format!(
            "attack({}) × {:.3} - defense({}) × {}{} = {}",
            ctx.attack,
            variance,
            ctx.defense,
            combat.defense_factor,
            if ctx.defending { " × stance" } else { "" },
            damage
        ),
    }
}

/// 依魔力決定施法效果，魔力不足回傳 `None`
pub fn resolve_spell(magic: Stat, spells: &SpellConfig) -> Option<SpellEffect> {
    if magic >= spells.area_threshold {
        Some(SpellEffect::Area {
            damage: magic.saturating_mul(spells.area_multiplier),
        })
    } else if magic >= spells.heal_threshold {
        Some(SpellEffect::Heal {
            amount: magic.saturating_mul(spells.heal_multiplier),
        })
    } else {
        None
    }
}

/// 扣血後的生命值，不低於 0
pub fn apply_damage(hp: Hp, damage: Hp) -> Hp {
    hp.saturating_sub(damage.max(0)).max(0)
}

/// 治療後的生命值，不高於上限
pub fn apply_heal(hp: Hp, max_hp: Hp, amount: Hp) -> Hp {
    hp.saturating_add(amount.max(0)).min(max_hp)
}
