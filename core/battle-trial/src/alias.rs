//! 型別別名

/// 棋盤座標
pub type Coord = usize;

/// 敵方單位識別碼（試煉內唯一，依生成順序從 0 開始）
pub type AdversaryId = u32;

/// 戰鬥屬性數值（攻擊、防禦、敏捷、魔力）
pub type Stat = i32;

/// 生命值
pub type Hp = i32;

/// 虛擬時鐘的毫秒數
pub type Millis = u64;
