//! 核心規則（純函式，不持有試煉狀態）

pub mod combat;
pub mod movement;
pub mod spawn;
