//! 敵方生成

use crate::config::TrialConfig;
use crate::entity::Adversary;
use rand::seq::IndexedRandom;

/// 隨機生成敵方
///
/// 數量在 [min, max] 之間均勻抽取，原型可重複抽中。
/// 編號從 0 起依序給予，位置依生成順序取用生成位置（超過時循環）。
pub fn spawn_adversaries<R: rand::Rng>(config: &TrialConfig, rng: &mut R) -> Vec<Adversary> {
    let count = rng.random_range(config.spawn.min..=config.spawn.max);
    (0..)
        .zip(config.spawn.slots.iter().cycle())
        .take(count)
        .filter_map(|(id, &slot)| {
            let archetype = config.archetypes.choose(rng)?;
            Some(Adversary::spawn(id, archetype, slot))
        })
        .collect()
}
