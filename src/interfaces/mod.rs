use crate::Node;
use serde::Serialize;

pub mod command_line;

/// 向用户反馈的消息类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Initialized {
        algorithm: &'static str,
        size: usize,
        best_fitness: f64,
    },
    Progress {
        algorithm: &'static str,
        generation: usize,
        best_fitness: f64,
    },
    BetterSolution {
        algorithm: &'static str,
        generation: usize,
        fitness: f64,
        permutation: Vec<Node>,
    },
    Elapsed {
        algorithm: &'static str,
        time: u64,
    },
}

/// 定义了向用户报告消息的接口，用于统一命令行和库调用方的输出方式
///
/// 各个前端只需要实现 post 方法，就可向用户报告求解过程中的各种数据
pub trait Interface {
    fn post(&self, message: Message);
}

/// 什么都不报告
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Interface for Silent {
    fn post(&self, _message: Message) {}
}
