//! 代价矩阵。`matrix[u][v]` 是从 u 转移到 v 的代价，不小于 [`FORBIDDEN`] 的代价表示禁止转移

use super::CostModel;
use crate::{Error, Node};

/// 禁止转移的哨兵值
pub const FORBIDDEN: i64 = 999_999;

#[derive(Debug, Clone)]
pub struct CostMatrix {
    rows: Vec<Vec<i64>>,
}

impl CostMatrix {
    /// 检查矩阵是否为方阵，并且所有代价都非负
    pub fn new(rows: Vec<Vec<i64>>) -> Result<Self, Error> {
        let n = rows.len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::parse(format!(
                    "代价矩阵不是方阵：第 {} 行有 {} 列，应为 {n} 列",
                    index + 1,
                    row.len()
                )));
            }
            if let Some(column) = row.iter().position(|&x| x < 0) {
                return Err(Error::parse(format!(
                    "代价矩阵第 {} 行第 {} 列的代价 {} 为负数",
                    index + 1,
                    column + 1,
                    row[column]
                )));
            }
        }
        Ok(Self { rows })
    }

    /// 不做检查地包装任意矩阵，越界的查询一律视为禁止转移
    pub fn from_rows_unchecked(rows: Vec<Vec<i64>>) -> Self {
        Self { rows }
    }

    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<i64>] {
        &self.rows
    }
}

impl CostModel for CostMatrix {
    fn cost(&self, from: Node, to: Node) -> Option<f64> {
        let value = *self.rows.get(from)?.get(to)?;
        (value < FORBIDDEN).then_some(value as f64)
    }
}
