use crate::optimizers::genetic::GeneticAlgorithm;
use crate::optimizers::particle_swarm::ParticleSwarm;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SolverConfig {
    Genetic(GeneticAlgorithm),
    ParticleSwarm(ParticleSwarm),
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 随机数种子，不提供时每次运行都不同
    pub seed: Option<u64>,
    #[serde(default = "default_solvers")]
    pub solvers: Vec<SolverConfig>,
}

fn default_solvers() -> Vec<SolverConfig> {
    vec![
        SolverConfig::Genetic(GeneticAlgorithm::default()),
        SolverConfig::ParticleSwarm(ParticleSwarm::default()),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            solvers: default_solvers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizers::particle_swarm::RepairPolicy;

    #[test]
    fn test_parse_config() {
        let content = r#"
seed: 42
solvers:
  - algorithm: genetic
    population_size: 30
    generations: 50
    elitism: false
  - algorithm: particle_swarm
    w: 0.5
    repair: revert_to_best
"#;
        let config: Config = serde_yaml::from_str(content).unwrap();
        assert_eq!(config.seed, Some(42));
        let SolverConfig::Genetic(genetic) = &config.solvers[0] else {
            panic!("第一个求解方法应为遗传算法");
        };
        assert_eq!(genetic.population_size, 30);
        assert_eq!(genetic.generations, 50);
        assert!(!genetic.elitism);
        assert_eq!(genetic.tournament_size, 3);
        assert_eq!(genetic.crossover_rate, 0.9);
        let SolverConfig::ParticleSwarm(swarm) = &config.solvers[1] else {
            panic!("第二个求解方法应为粒子群算法");
        };
        assert_eq!(swarm.w, 0.5);
        assert_eq!(swarm.c1, 1.5);
        assert_eq!(swarm.swarm_size, 50);
        assert_eq!(swarm.repair, RepairPolicy::RevertToBest);
    }

    #[test]
    fn test_default_solvers() {
        let config: Config = serde_yaml::from_str("seed: 1").unwrap();
        assert_eq!(config.solvers.len(), 2);
        let round_trip: Config =
            serde_yaml::from_str(&serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(round_trip.seed, Some(1));
    }

    #[test]
    fn test_unknown_algorithm() {
        let content = "solvers:\n  - algorithm: tabu_search\n";
        assert!(serde_yaml::from_str::<Config>(content).is_err());
    }
}
