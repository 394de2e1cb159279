//! sop: 序列排序问题求解器［命令行版］
//!
//! `sop` 是一个使用 Rust 编写的命令行程序。用户提供 SOP 实例文件以及求解配置文件，本程序依次运行遗传算法和粒子群算法，导出每次运行的适应度曲线和最优解。

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sop::config::Config;
use sop::constraints::Constraints;
use sop::costs::graph::example_graph;
use sop::interfaces::command_line::{instance_label, Command, CommandLine, CommandLineArgs};
use sop::io::read_sop;
use sop::objectives::{Objective, SopObjective};
use sop::Error;
use tracing::{info, Level};

fn run_optimization<O: Objective>(
    instance: &str,
    objective: &O,
    config: &Config,
    seed: u64,
    cli: &CommandLine,
) -> Result<(), Error> {
    // 每个求解方法使用同一个种子，便于单独复现
    for solver in &config.solvers {
        let mut rng = StdRng::seed_from_u64(seed);
        info!("在 {instance} 上运行 {}，种子为 {seed}", solver.name());
        let result = solver.solve(objective, cli, &mut rng)?;
        let trace = cli.write_trace(instance, &result)?;
        let summary = cli.write_result(instance, seed, &result)?;
        info!(
            "适应度曲线保存于 {}，最优解保存于 {}",
            trace.display(),
            summary.display()
        );
        cli.report_result(instance, &result);
    }
    Ok(())
}

fn run<O: Objective>(
    instance: &str,
    objective: &O,
    config: &Config,
    seed: u64,
    cli: &CommandLine,
) -> Result<(), Error> {
    match &cli.args.command {
        Command::Optimize => run_optimization(instance, objective, config, seed, cli),
        Command::Evaluate { nodes } => {
            let mut sorted = nodes.clone();
            sorted.sort_unstable();
            let mut expected = objective.nodes().to_vec();
            expected.sort_unstable();
            if sorted != expected {
                return Err(Error::configuration(format!(
                    "{nodes:?} 不是 {instance} 中全部节点的排列"
                )));
            }
            CommandLine::report_fitness(instance, nodes, objective.evaluate(nodes));
            Ok(())
        }
    }
}

fn main() -> Result<(), Error> {
    let args = CommandLineArgs::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let cli = CommandLine::new(args);
    let config = cli.load_config()?;
    let seed = cli
        .args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());

    if cli.args.instance.is_empty() {
        let (graph, nodes, precedence) = example_graph()?;
        let objective = SopObjective::new(graph, Constraints::new(&nodes, &precedence)?);
        return run("example", &objective, &config, seed, &cli);
    }
    for path in &cli.args.instance {
        let instance = read_sop(path)?;
        let objective = instance.objective()?;
        info!(
            "读取实例 {}：{} 个节点，{} 条先后约束",
            path.display(),
            instance.nodes.len(),
            instance.precedence.len()
        );
        run(&instance_label(path), &objective, &config, seed, &cli)?;
    }
    Ok(())
}
