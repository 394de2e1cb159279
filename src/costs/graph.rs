//! 带权有向图。没有边的两个节点之间不能直接转移

use super::CostModel;
use crate::constraints::Precedence;
use crate::{Error, Node};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct WeightedDigraph {
    nodes: Vec<Node>,
    edges: FxHashMap<(Node, Node), f64>,
}

impl WeightedDigraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    /// 添加一条边，两端的节点不存在时一并添加
    pub fn add_edge(&mut self, from: Node, to: Node, weight: f64) -> Result<(), Error> {
        if weight < 0.0 || !weight.is_finite() {
            return Err(Error::configuration(format!(
                "边 ({from}, {to}) 的权重 {weight} 不是非负有限数"
            )));
        }
        self.add_node(from);
        self.add_node(to);
        self.edges.insert((from, to), weight);
        Ok(())
    }

    pub fn has_edge(&self, from: Node, to: Node) -> bool {
        self.edges.contains_key(&(from, to))
    }

    pub fn weight(&self, from: Node, to: Node) -> Option<f64> {
        self.edges.get(&(from, to)).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl CostModel for WeightedDigraph {
    fn cost(&self, from: Node, to: Node) -> Option<f64> {
        self.weight(from, to)
    }
}

/// 五个节点的示例图，节点从 1 开始编号
pub fn example_graph() -> Result<(WeightedDigraph, Vec<Node>, Vec<Precedence>), Error> {
    let mut graph = WeightedDigraph::new();
    let nodes: Vec<Node> = (1..=5).collect();
    for &node in &nodes {
        graph.add_node(node);
    }
    let edges = [
        ((1, 2), 10.0),
        ((1, 3), 3.0),
        ((2, 3), 1.0),
        ((2, 4), 2.0),
        ((3, 4), 8.0),
        ((3, 5), 2.0),
        ((4, 5), 4.0),
    ];
    for ((from, to), weight) in edges {
        graph.add_edge(from, to, weight)?;
    }
    let precedence = vec![(1, 3), (2, 4)];
    Ok((graph, nodes, precedence))
}
