//! 試煉戰鬥引擎
//!
//! 5×5 棋盤上的回合制戰術戰鬥，包括：
//! - 棋盤佔據與曼哈頓距離
//! - 英雄與敵方單位（三種原型）
//! - 移動、攻擊、施法、防禦的判定
//! - 回合狀態機與敵方行動排程（虛擬時鐘）
//! - 戰鬥事件通知與勝利獎勵

pub mod alias;
pub mod board;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod event;
pub mod loader;
pub mod logic;
pub mod policy;
pub mod progression;
pub mod scheduler;
pub mod state;
pub mod trial;

// 重新導出常用類型
pub use board::{Board, Occupant, Position};
pub use config::TrialConfig;
pub use entity::{Adversary, Archetype, CharacterProfile, Hero, ProgressionStats};
pub use error::{Error, ErrorKind, Result};
pub use event::{BattleEvent, BattleObserver};
pub use progression::Progression;
pub use state::{BattleState, Outcome, Phase};
pub use trial::{AdversaryPlacement, RewardApplier, Trial, TrialSetup};
