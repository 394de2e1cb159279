//! libsop 是使用 Rust 实现的序列排序问题（Sequential Ordering Problem, SOP）的元启发式求解库。
//!
//! 给定一组任务、任意两个任务之间的转移代价以及一组先后约束，目标是找到一条代价最小、并且每个任务都排在它所有前驱之后的哈密顿路径。
//! 本库提供两种互相独立的求解方法：遗传算法，以及适用于排列空间的粒子群算法。二者都基于 [`costs::CostModel`] 来计算代价，所以带权有向图和代价矩阵这两种输入共用同一套实现。
//!
//! sop 是使用 libsop 实现的命令行程序，用户提供 SOP 实例文件和求解配置，本程序依次运行各个求解方法，并导出每次运行的适应度曲线。

pub mod config;
pub mod constraints;
pub mod costs;
pub mod interfaces;
pub mod io;
pub mod objectives;
pub mod operators;
pub mod optimizers;

use std::fmt::{self, Display};

/// 任务的编号。图示例从 1 开始编号，实例文件从 0 开始编号
pub type Node = usize;

/// 一个候选解：每个节点恰好出现一次的序列
pub type Permutation = Vec<Node>;

/// 交换序列中的一步，交换两个位置上的节点
pub type Swap = (usize, usize);

/// 违反先后约束或者经过被禁止的转移时的适应度
pub const INFEASIBLE: f64 = f64::INFINITY;

/// 错误的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 实例文件格式有误
    Parse,
    /// 求解参数不合法
    Configuration,
    /// 约束无法满足
    Unsatisfiable,
    /// 读写文件失败
    Io,
    Other,
}

/// 错误类型
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn unsatisfiable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsatisfiable, message)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::new(ErrorKind::Other, value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::new(ErrorKind::Other, value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, value.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::new(ErrorKind::Configuration, format!("配置解析错误: {value}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorKind::Other, value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::new(ErrorKind::Io, value.to_string())
    }
}
