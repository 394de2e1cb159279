//! SOP 实例文件的读取
//!
//! 文件由若干 `KEY: value` 头部行和两个数据段组成：`EDGE_WEIGHT_SECTION` 之后每行是代价矩阵的一行，
//! `PRECEDENCE_SECTION` 之后每行是一对从 1 开始编号的节点 `i j`，表示 `i` 必须先于 `j`。读到 `EOF` 即停止。

use crate::constraints::{Constraints, Precedence};
use crate::costs::matrix::CostMatrix;
use crate::objectives::SopObjective;
use crate::{Error, Node};
use regex::Regex;
use std::fs::read_to_string;
use std::path::Path;
use tracing::debug;

/// 从实例文件中读出的全部信息，节点从 0 开始编号
#[derive(Debug, Clone)]
pub struct SopInstance {
    pub name: String,
    pub nodes: Vec<Node>,
    pub matrix: CostMatrix,
    /// 已经转换成从 0 开始编号的先后约束
    pub precedence: Vec<Precedence>,
}

impl SopInstance {
    /// 构造这个实例对应的目标函数，约束有环时返回错误
    pub fn objective(&self) -> Result<SopObjective<CostMatrix>, Error> {
        let constraints = Constraints::new(&self.nodes, &self.precedence)?;
        Ok(SopObjective::new(self.matrix.clone(), constraints))
    }
}

enum Section {
    Header,
    Matrix,
    Precedence,
}

pub fn read_sop<P: AsRef<Path>>(path: P) -> Result<SopInstance, Error> {
    let path = path.as_ref();
    let content = read_to_string(path).map_err(|e| {
        Error::new(
            crate::ErrorKind::Io,
            format!("无法读取 {}: {e}", path.display()),
        )
    })?;
    let mut instance = parse_sop(&content)?;
    if instance.name.is_empty() {
        instance.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(instance)
}

pub fn parse_sop(content: &str) -> Result<SopInstance, Error> {
    let header = Regex::new(r"^([A-Z_]+)\s*:\s*(.*)$").map_err(|e| Error::from(e.to_string()))?;
    let mut name = String::new();
    let mut dimension: Option<usize> = None;
    let mut rows: Vec<Vec<i64>> = vec![];
    let mut pairs: Vec<(usize, usize)> = vec![];
    let mut section = Section::Header;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        let number = number + 1;
        if line.starts_with("EOF") {
            break;
        }
        if line.starts_with("EDGE_WEIGHT_SECTION") {
            section = Section::Matrix;
            continue;
        }
        if line.starts_with("PRECEDENCE_SECTION") || line.starts_with("PRECEDENCE_SECECTION") {
            section = Section::Precedence;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        match section {
            Section::Header => {
                let Some(captures) = header.captures(line) else {
                    debug!("忽略第 {number} 行：{line}");
                    continue;
                };
                let value = captures[2].trim();
                match &captures[1] {
                    "NAME" => name = value.to_string(),
                    "DIMENSION" => {
                        let n = value.parse::<usize>().map_err(|_| {
                            Error::parse(format!(
                                "第 {number} 行：DIMENSION 不是非负整数：{value}"
                            ))
                        })?;
                        dimension = Some(n);
                    }
                    _ => {}
                }
            }
            Section::Matrix => {
                let row = integers::<i64>(line, number)?;
                rows.push(row);
            }
            Section::Precedence => {
                let parts = integers::<usize>(line, number)?;
                if let [before, after] = parts[..] {
                    pairs.push((before, after));
                } else {
                    debug!("忽略第 {number} 行：先后约束应当恰好包含两个节点");
                }
            }
        }
    }

    let n = dimension.ok_or_else(|| Error::parse("缺少 DIMENSION"))?;
    if rows.len() != n {
        return Err(Error::parse(format!(
            "代价矩阵应当有 {n} 行，实际有 {} 行",
            rows.len()
        )));
    }
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(Error::parse(format!(
            "代价矩阵第 {} 行应当有 {n} 列，实际有 {} 列",
            index + 1,
            row.len()
        )));
    }
    let mut precedence = Vec::with_capacity(pairs.len());
    for (before, after) in pairs {
        if !(1..=n).contains(&before) || !(1..=n).contains(&after) {
            return Err(Error::parse(format!(
                "先后约束 ({before}, {after}) 超出了 1 到 {n} 的范围"
            )));
        }
        precedence.push((before - 1, after - 1));
    }
    Ok(SopInstance {
        name,
        nodes: (0..n).collect(),
        matrix: CostMatrix::new(rows)?,
        precedence,
    })
}

fn integers<T: std::str::FromStr>(line: &str, number: usize) -> Result<Vec<T>, Error> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| Error::parse(format!("第 {number} 行：无法解析整数 {token}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::CostModel;
    use crate::objectives::Objective;
    use crate::ErrorKind;

    const SAMPLE: &str = "NAME: tiny
TYPE: SOP
DIMENSION: 3
EDGE_WEIGHT_SECTION
0 5 999999
2 0 4
1 999999 0
PRECEDENCE_SECTION
1 3
EOF
this line is ignored
";

    #[test]
    fn test_parse_sample() {
        let instance = parse_sop(SAMPLE).unwrap();
        assert_eq!(instance.name, "tiny");
        assert_eq!(instance.nodes, vec![0, 1, 2]);
        assert_eq!(instance.precedence, vec![(0, 2)]);
        assert_eq!(instance.matrix.cost(0, 1), Some(5.0));
        assert_eq!(instance.matrix.cost(0, 2), None);
        let objective = instance.objective().unwrap();
        assert_eq!(objective.evaluate(&[0, 1, 2]), 9.0);
        assert_eq!(objective.evaluate(&[2, 1, 0]), crate::INFEASIBLE);
    }

    #[test]
    fn test_misspelled_header() {
        let content = SAMPLE.replace("PRECEDENCE_SECTION", "PRECEDENCE_SECECTION");
        assert_eq!(parse_sop(&content).unwrap().precedence, vec![(0, 2)]);
    }

    #[test]
    fn test_missing_dimension() {
        let content = SAMPLE.replace("DIMENSION: 3\n", "");
        assert_eq!(parse_sop(&content).unwrap_err().kind, ErrorKind::Parse);
    }

    #[test]
    fn test_ragged_matrix() {
        let content = SAMPLE.replace("2 0 4", "2 0");
        assert_eq!(parse_sop(&content).unwrap_err().kind, ErrorKind::Parse);
        let content = SAMPLE.replace("1 999999 0\n", "");
        assert_eq!(parse_sop(&content).unwrap_err().kind, ErrorKind::Parse);
    }

    #[test]
    fn test_bad_tokens() {
        let content = SAMPLE.replace("2 0 4", "2 x 4");
        assert_eq!(parse_sop(&content).unwrap_err().kind, ErrorKind::Parse);
        let content = SAMPLE.replace("1 3\n", "1 4\n");
        assert_eq!(parse_sop(&content).unwrap_err().kind, ErrorKind::Parse);
    }

    #[test]
    fn test_cyclic_instance() {
        let content = SAMPLE.replace("1 3\n", "1 3\n3 1\n");
        let instance = parse_sop(&content).unwrap();
        assert_eq!(instance.objective().unwrap_err().kind, ErrorKind::Unsatisfiable);
    }
}
