//! 錯誤處理系統
//!
//! 非法行動（回合不對、點數不足、距離過遠等）以錯誤回傳，不改動狀態也不發出通知。
//! 引擎內部沒有不可恢復的錯誤。

use crate::alias::{AdversaryId, Coord, Stat};
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Trial(#[from] TrialError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

/// 棋盤錯誤
#[derive(Debug, ThisError)]
pub enum BoardError {
    #[error("位置超出棋盤邊界: ({x}, {y}) 邊界 ({width}, {height})")]
    OutOfBounds {
        x: Coord,
        y: Coord,
        width: Coord,
        height: Coord,
    },
    #[error("位置 ({x}, {y}) 已被 {occupant} 佔據")]
    CellOccupied { occupant: String, x: Coord, y: Coord },
    #[error("佔據者已存在於位置 ({x}, {y})，無法重複放置: {occupant}")]
    OccupantAlreadyPlaced {
        occupant: String,
        x: Coord,
        y: Coord,
    },
    #[error("佔據者不在棋盤上: {occupant}")]
    NotOnBoard { occupant: String },
}

/// 非法行動（不改動狀態）
#[derive(Debug, ThisError)]
pub enum ActionError {
    #[error("現在不是玩家回合")]
    NotPlayerTurn,
    #[error("本回合已無行動點數")]
    NoActionPoints,
    #[error("試煉已結束")]
    TrialOver,
    #[error("移動無效：距離 {distance} 超過上限 {max}")]
    OutOfRange { distance: Coord, max: Coord },
    #[error("移動無效：({x}, {y}) 已被佔據")]
    DestinationOccupied { x: Coord, y: Coord },
    #[error("移動無效：({x}, {y}) 不在棋盤內")]
    DestinationOutOfBounds { x: Coord, y: Coord },
    #[error("目標 {id} 不存在")]
    UnknownTarget { id: AdversaryId },
    #[error("目標 {id} 已被擊敗")]
    TargetDefeated { id: AdversaryId },
    #[error("目標太遠：距離 {distance}")]
    TargetOutOfReach { id: AdversaryId, distance: Coord },
    #[error("魔力 {magic} 太弱，無法施法")]
    MagicTooWeak { magic: Stat },
}

/// 試煉流程錯誤
#[derive(Debug, ThisError)]
pub enum TrialError {
    #[error("請先選擇角色：缺少角色或進度資料")]
    MissingPrerequisite,
    #[error("未知的敵方原型: {key}")]
    UnknownArchetype { key: String },
    #[error("佈局中缺少英雄位置或英雄不只一個（找到 {found} 個）")]
    HeroPlacement { found: usize },
    #[error("試煉至少需要一個敵方")]
    NoAdversaries,
    #[error("佈局尺寸 {width}x{height} 與棋盤 {expected_width}x{expected_height} 不符")]
    LayoutSize {
        width: Coord,
        height: Coord,
        expected_width: Coord,
        expected_height: Coord,
    },
}

/// 角色成長錯誤
#[derive(Debug, ThisError)]
pub enum ProgressionError {
    #[error("沒有可用的升級點數")]
    NoUpgradePoints,
}

/// 格式載入錯誤
#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("解析失敗: {0}")]
    ParseError(String),
    #[error("{format} 反序列化失敗: {reason}")]
    DeserializeError { format: String, reason: String },
    #[error("設定無效: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 是否為非法行動（玩家操作被拒絕）
    pub fn is_illegal_action(&self) -> bool {
        matches!(self.kind, ErrorKind::Action(_))
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(e.context(context)),
        }
    }
}
