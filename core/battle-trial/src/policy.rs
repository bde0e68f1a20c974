//! 敵方決策
//!
//! 與英雄相鄰就攻擊，否則朝英雄貪婪前進一格；前方被擋住就原地不動。
//! 所有敵方原型共用同一套規則，行為傾向只供顯示。

use crate::alias::AdversaryId;
use crate::board::{distance, Board, Occupant, Position};
use crate::constants::ATTACK_RANGE;
use crate::error::{BoardError, Result};
use crate::logic::movement::greedy_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdversaryAction {
    Attack,
    Step { to: Position },
    Hold,
}

pub fn decide_action(board: &Board, adversary_id: AdversaryId) -> Result<AdversaryAction> {
    let actor = locate(board, Occupant::Adversary(adversary_id))?;
    let hero = locate(board, Occupant::Hero)?;

    if distance(actor, hero) == ATTACK_RANGE {
        return Ok(AdversaryAction::Attack);
    }
    Ok(match greedy_step(board, actor, hero) {
        Some(to) => AdversaryAction::Step { to },
        None => AdversaryAction::Hold,
    })
}

fn locate(board: &Board, occupant: Occupant) -> Result<Position> {
    board.position_of(occupant).ok_or_else(|| {
        BoardError::NotOnBoard {
            occupant: occupant.to_string(),
        }
        .into()
    })
}
