use super::{Interface, Message};
use crate::config::Config;
use crate::optimizers::OptimizationResult;
use crate::{Error, ErrorKind, Node};
use chrono::Local;
use clap::{Parser, Subcommand};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 命令行参数的定义
#[derive(Parser, Clone, Debug)]
#[command(name = "序列排序问题求解器")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,
    /// 求解配置文件，默认为 config.yaml，该文件不存在时使用内置的默认配置
    pub config: Option<PathBuf>,
    /// SOP 实例文件，可以提供多个；不提供时求解内置的五节点示例图
    #[arg(short, long, value_name = "FILE")]
    pub instance: Vec<PathBuf>,
    /// 随机数种子，优先于配置文件中的 seed
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// 输出目录，默认为 output-<时间戳>
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// 输出每一代的进度
    #[arg(short, long)]
    pub verbose: bool,
    /// 以 JSON 行的形式输出求解过程中的消息
    #[arg(long)]
    pub json: bool,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// 依次运行配置中的每个求解方法，并导出适应度曲线和最优解
    Optimize,
    /// 计算给定序列的适应度
    Evaluate {
        /// 以空格分隔的节点序列
        #[arg(required = true)]
        nodes: Vec<Node>,
    },
}

/// 写入输出目录的求解结果摘要
#[derive(Debug, Serialize)]
struct Summary<'a> {
    instance: &'a str,
    algorithm: &'a str,
    seed: u64,
    fitness: f64,
    permutation: &'a [Node],
    elapsed: u64,
}

/// 通过命令行来使用 libsop 的入口，实现了界面特征
pub struct CommandLine {
    pub args: CommandLineArgs,
    pub output_dir: PathBuf,
}

impl CommandLine {
    pub fn new(args: CommandLineArgs) -> Self {
        let output_dir = args.output.clone().unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        Self { args, output_dir }
    }

    /// 读取求解配置。显式指定的文件不存在时报错，默认的 config.yaml 不存在时回退到默认配置
    pub fn load_config(&self) -> Result<Config, Error> {
        let (path, explicit) = match &self.args.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from("config.yaml"), false),
        };
        if !explicit && !path.exists() {
            debug!("未找到 config.yaml，使用默认配置");
            return Ok(Config::default());
        }
        let content = read_to_string(&path).map_err(|e| {
            Error::new(
                ErrorKind::Io,
                format!("无法读取配置文件 {}: {e}", path.display()),
            )
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        for solver in &config.solvers {
            solver.validate()?;
        }
        Ok(config)
    }

    fn instance_dir(&self, instance: &str) -> Result<PathBuf, Error> {
        let dir = self.output_dir.join(instance);
        create_dir_all(&dir)?;
        Ok(dir)
    }

    /// 以制表符分隔的 `记录点 适应度` 两列导出适应度曲线
    pub fn write_trace(
        &self,
        instance: &str,
        result: &OptimizationResult,
    ) -> Result<PathBuf, Error> {
        let path = self
            .instance_dir(instance)?
            .join(format!("{}.tsv", result.algorithm));
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(&path)?;
        for (index, fitness) in result.trace.iter().enumerate() {
            writer.serialize((index, fitness))?;
        }
        writer.flush()?;
        Ok(path)
    }

    pub fn write_result(
        &self,
        instance: &str,
        seed: u64,
        result: &OptimizationResult,
    ) -> Result<PathBuf, Error> {
        let path = self
            .instance_dir(instance)?
            .join(format!("{}.yaml", result.algorithm));
        let summary = Summary {
            instance,
            algorithm: &result.algorithm,
            seed,
            fitness: result.fitness,
            permutation: &result.permutation,
            elapsed: result.elapsed,
        };
        write(&path, serde_yaml::to_string(&summary)?)?;
        Ok(path)
    }

    pub fn report_result(&self, instance: &str, result: &OptimizationResult) {
        println!(
            "{instance}\t{}\t最优代价 {}\t用时 {} ms\t{:?}",
            result.algorithm, result.fitness, result.elapsed, result.permutation
        );
    }

    pub fn report_fitness(instance: &str, nodes: &[Node], fitness: f64) {
        println!("{instance}\t{nodes:?}\t{fitness}");
    }
}

/// 实例文件名去掉扩展名后作为输出子目录名
pub fn instance_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Interface for CommandLine {
    fn post(&self, message: Message) {
        if self.args.json {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => debug!("消息无法序列化：{e}"),
            }
            return;
        }
        match message {
            Message::Initialized {
                algorithm,
                size,
                best_fitness,
            } => info!("{algorithm}：初始化了 {size} 个个体，初始最优适应度为 {best_fitness}"),
            Message::Progress {
                algorithm,
                generation,
                best_fitness,
            } => debug!("{algorithm}：第 {generation} 代，最优适应度为 {best_fitness}"),
            Message::BetterSolution {
                algorithm,
                generation,
                fitness,
                permutation,
            } => info!(
                "{} {algorithm}：第 {generation} 代搜索到了更好的解，适应度为 {fitness}，序列为 {permutation:?}",
                Local::now().format("%H:%M:%S")
            ),
            Message::Elapsed { algorithm, time } => info!("{algorithm}：求解用时 {time} ms"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CommandLineArgs {
        let mut argv = vec!["sop"];
        argv.extend_from_slice(extra);
        CommandLineArgs::parse_from(argv)
    }

    fn temporary_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("libsop-{name}-{}", std::process::id()));
        create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_arguments() {
        let parsed = args(&["-i", "a.sop", "-i", "b.sop", "-s", "7", "optimize"]);
        assert_eq!(parsed.instance.len(), 2);
        assert_eq!(parsed.seed, Some(7));
        assert!(matches!(parsed.command, Command::Optimize));
        let parsed = args(&["evaluate", "1", "2", "3"]);
        let Command::Evaluate { nodes } = parsed.command else {
            panic!("应为 evaluate 子命令");
        };
        assert_eq!(nodes, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_explicit_config() {
        let cli = CommandLine::new(args(&["no-such-config.yaml", "optimize"]));
        assert_eq!(cli.load_config().unwrap_err().kind, ErrorKind::Io);
    }

    #[test]
    fn test_write_outputs() {
        let dir = temporary_dir("outputs");
        let cli = CommandLine::new(args(&["-o", dir.to_str().unwrap(), "optimize"]));
        let result = OptimizationResult {
            algorithm: "genetic".to_string(),
            permutation: vec![0, 1, 2],
            fitness: 9.0,
            trace: vec![12.0, 9.0],
            elapsed: 3,
        };
        let trace = cli.write_trace("tiny", &result).unwrap();
        assert_eq!(read_to_string(trace).unwrap(), "0\t12.0\n1\t9.0\n");
        let summary = cli.write_result("tiny", 42, &result).unwrap();
        let content = read_to_string(summary).unwrap();
        assert!(content.contains("fitness: 9.0"));
        assert!(content.contains("seed: 42"));
    }

    #[test]
    fn test_instance_label() {
        assert_eq!(instance_label(Path::new("data/ESC07.sop")), "ESC07");
    }
}
