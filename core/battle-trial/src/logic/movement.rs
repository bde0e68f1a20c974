//! 移動邏輯

use crate::alias::Coord;
use crate::board::{distance, Board, Position};
use crate::error::{ActionError, Result};

/// 移動方向（四方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 計算從當前位置往指定方向移動一格後的位置，檢查棋盤邊界
///
/// 返回 `None` 當新位置超出棋盤邊界
pub fn step_in_direction(board: &Board, pos: Position, direction: Direction) -> Option<Position> {
    let new_pos = match direction {
        Direction::Up => Position::new(pos.x, pos.y.checked_sub(1)?),
        Direction::Down => Position::new(pos.x, pos.y + 1),
        Direction::Left => Position::new(pos.x.checked_sub(1)?, pos.y),
        Direction::Right => Position::new(pos.x + 1, pos.y),
    };
    board.is_within_bounds(new_pos).then_some(new_pos)
}

/// 朝目標前進一格的方向
///
/// 沿差距較大的軸前進；兩軸差距相同時走 y 軸。
pub fn greedy_direction(from: Position, target: Position) -> Direction {
    let dx = from.x.abs_diff(target.x);
    let dy = from.y.abs_diff(target.y);
    if dx > dy {
        if target.x > from.x {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if target.y > from.y {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// 朝目標前進一格的位置；只嘗試一個方向，被擋住（或出界）就不動
pub fn greedy_step(board: &Board, from: Position, target: Position) -> Option<Position> {
    let next = step_in_direction(board, from, greedy_direction(from, target))?;
    board.is_empty(next).then_some(next)
}

/// 檢查英雄能否從 `from` 移到 `to`
pub fn check_hero_move(board: &Board, from: Position, to: Position, max: Coord) -> Result<()> {
    if !board.is_within_bounds(to) {
        return Err(ActionError::DestinationOutOfBounds { x: to.x, y: to.y }.into());
    }
    let dist = distance(from, to);
    if dist > max {
        return Err(ActionError::OutOfRange {
            distance: dist,
            max,
        }
        .into());
    }
    if !board.is_empty(to) {
        return Err(ActionError::DestinationOccupied { x: to.x, y: to.y }.into());
    }
    Ok(())
}
