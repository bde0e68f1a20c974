//! 棋盤佈局載入器

use crate::board::{Board, Position};
use crate::error::{LoadError, Result};
use std::collections::HashMap;

/// 從 ASCII 格式載入棋盤佈局
///
/// ASCII 格式：每行用空格分隔的符號
/// - `.` = 空格
/// - 其他字串（`H`、`F`、`S` 等）= 標記位置
/// - 相同的標記會全部收集成 Vec（依讀取順序：先列後行）
///
/// 返回的棋盤尚未放置任何佔據者，標記由呼叫端解讀。
///
/// 例如：
/// ```text
/// F . S . .
/// . . . . .
/// . . H . .
/// ```
pub fn load_from_ascii(ascii: &str) -> Result<(Board, HashMap<String, Vec<Position>>)> {
    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let Some(first) = lines.first() else {
        return Err(LoadError::ParseError("棋盤為空".to_string()).into());
    };

    // 推導寬度（第一行的符號數）
    let width = first.split_whitespace().count();
    let height = lines.len();

    let mut markers: HashMap<String, Vec<Position>> = HashMap::new();

    for (y, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != width {
            return Err(LoadError::ParseError(format!(
                "第 {y} 行有 {} 格，預期 {width} 格",
                cells.len()
            ))
            .into());
        }
        for (x, cell) in cells.into_iter().enumerate() {
            if cell != "." {
                markers
                    .entry(cell.to_string())
                    .or_default()
                    .push(Position { x, y });
            }
        }
    }

    Ok((Board::new(width, height), markers))
}
