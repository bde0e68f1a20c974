//! 棋盤與佔據索引
//!
//! 每格最多一個佔據者。所有佔據變更都必須透過 `place` / `clear` / `move_occupant`，
//! 讓「位置 → 佔據者」與「佔據者 → 位置」兩個方向永遠同步。

use crate::alias::{AdversaryId, Coord};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 棋盤位置（座標）
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 曼哈頓距離 |Δx| + |Δy|
pub fn distance(a: Position, b: Position) -> Coord {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// 格子上的佔據者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Hero,
    Adversary(AdversaryId),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Hero => write!(f, "hero"),
            Occupant::Adversary(id) => write!(f, "adversary-{id}"),
        }
    }
}

/// 固定尺寸棋盤，附雙向佔據索引
#[derive(Debug, Clone, Default)]
pub struct Board {
    width: Coord,
    height: Coord,
    pos_to_occupant: HashMap<Position, Occupant>,
    occupant_to_pos: HashMap<Occupant, Position>,
}

impl Board {
    pub fn new(width: Coord, height: Coord) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    /// 驗證位置是否在棋盤邊界內
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// 位置在棋盤內且無佔據者
    pub fn is_empty(&self, pos: Position) -> bool {
        self.is_within_bounds(pos) && !self.pos_to_occupant.contains_key(&pos)
    }

    pub fn occupant_at(&self, pos: Position) -> Option<Occupant> {
        self.pos_to_occupant.get(&pos).copied()
    }

    pub fn position_of(&self, occupant: Occupant) -> Option<Position> {
        self.occupant_to_pos.get(&occupant).copied()
    }

    /// 所有被佔據的格子
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        self.pos_to_occupant.iter().map(|(pos, occ)| (*pos, *occ))
    }

    /// 放置佔據者
    ///
    /// 位置必須在棋盤內且為空，佔據者不可已在其他格子上。
    pub fn place(&mut self, occupant: Occupant, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        if let Some(existing) = self.occupant_to_pos.get(&occupant) {
            return Err(BoardError::OccupantAlreadyPlaced {
                occupant: occupant.to_string(),
                x: existing.x,
                y: existing.y,
            }
            .into());
        }
        if let Some(current) = self.pos_to_occupant.get(&pos) {
            return Err(BoardError::CellOccupied {
                occupant: current.to_string(),
                x: pos.x,
                y: pos.y,
            }
            .into());
        }

        self.pos_to_occupant.insert(pos, occupant);
        self.occupant_to_pos.insert(occupant, pos);
        Ok(())
    }

    /// 清空格子，回傳原本的佔據者（空格不做任何事）
    pub fn clear(&mut self, pos: Position) -> Option<Occupant> {
        let occupant = self.pos_to_occupant.remove(&pos)?;
        self.occupant_to_pos.remove(&occupant);
        Some(occupant)
    }

    /// 將佔據者移到新位置（清空舊格與佔據新格為同一步）
    pub fn move_occupant(&mut self, occupant: Occupant, to: Position) -> Result<Position> {
        self.check_bounds(to)?;
        if let Some(current) = self.pos_to_occupant.get(&to) {
            return Err(BoardError::CellOccupied {
                occupant: current.to_string(),
                x: to.x,
                y: to.y,
            }
            .into());
        }
        let Some(from) = self.position_of(occupant) else {
            return Err(BoardError::NotOnBoard {
                occupant: occupant.to_string(),
            }
            .into());
        };
        self.pos_to_occupant.remove(&from);
        self.pos_to_occupant.insert(to, occupant);
        self.occupant_to_pos.insert(occupant, to);
        Ok(from)
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.is_within_bounds(pos) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            }
            .into())
        }
    }
}
