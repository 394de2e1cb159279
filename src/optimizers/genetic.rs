//! 遗传算法
//!
//! 锦标赛选择、顺序杂交、交换变异，可选精英保留；新一代完全替换旧一代，运行固定的代数后结束。

use super::{argmin, check_rate, OptimizationResult};
use crate::constraints::Constraints;
use crate::interfaces::{Interface, Message};
use crate::objectives::Objective;
use crate::operators::crossover::DEFAULT_CROSSOVER_ATTEMPTS;
use crate::operators::initialization::{initialize_population, DEFAULT_MAX_ATTEMPTS};
use crate::operators::{Crossover, Mutation, OrderCrossover, SwapMutation};
use crate::{Error, Permutation};
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Instant;

pub const NAME: &str = "genetic";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithm {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elitism: bool,
    pub tournament_size: usize,
    pub max_crossover_attempts: usize,
    pub max_initial_attempts: usize,
}

impl Default for GeneticAlgorithm {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            elitism: true,
            tournament_size: 3,
            max_crossover_attempts: DEFAULT_CROSSOVER_ATTEMPTS,
            max_initial_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GeneticAlgorithm {
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size == 0 {
            return Err(Error::configuration("种群规模至少为 1"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(Error::configuration(format!(
                "锦标赛规模 {} 应当在 1 到种群规模 {} 之间",
                self.tournament_size, self.population_size
            )));
        }
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)
    }

    /// 使用默认的顺序杂交和交换变异求解
    pub fn optimize<O: Objective, R: Rng + ?Sized>(
        &self,
        objective: &O,
        interface: &dyn Interface,
        rng: &mut R,
    ) -> Result<OptimizationResult, Error> {
        let crossover = OrderCrossover {
            max_attempts: self.max_crossover_attempts,
        };
        let mutation = SwapMutation {
            rate: self.mutation_rate,
        };
        self.optimize_with(objective, &crossover, &mutation, interface, rng)
    }

    /// 遗传算法求解的主函数
    pub fn optimize_with<O, X, M, R>(
        &self,
        objective: &O,
        crossover: &X,
        mutation: &M,
        interface: &dyn Interface,
        rng: &mut R,
    ) -> Result<OptimizationResult, Error>
    where
        O: Objective,
        X: Crossover,
        M: Mutation,
        R: Rng + ?Sized,
    {
        self.validate()?;
        let start = Instant::now();
        let constraints = objective.constraints();
        let mut population = initialize_population(
            constraints,
            self.population_size,
            self.max_initial_attempts,
            rng,
        );
        let mut fitness = evaluate_all(objective, &population);
        let mut best_so_far = fitness[argmin(&fitness)];
        interface.post(Message::Initialized {
            algorithm: NAME,
            size: population.len(),
            best_fitness: best_so_far,
        });
        let mut trace = Vec::with_capacity(self.generations);

        for generation in 0..self.generations {
            let mut next_population = Vec::with_capacity(self.population_size);
            if self.elitism {
                next_population.push(population[argmin(&fitness)].clone());
            }
            while next_population.len() < self.population_size {
                let parent1 = &population[self.tournament(&fitness, rng)];
                let parent2 = &population[self.tournament(&fitness, rng)];
                let mut child = self.breed(parent1, parent2, crossover, constraints, rng);
                mutation.mutate(&mut child, constraints, rng);
                next_population.push(child);
            }
            population = next_population;
            fitness = evaluate_all(objective, &population);

            let best_index = argmin(&fitness);
            let best = fitness[best_index];
            trace.push(best);
            debug!("遗传算法第 {} 代：最优适应度 {best}", generation + 1);
            interface.post(Message::Progress {
                algorithm: NAME,
                generation: generation + 1,
                best_fitness: best,
            });
            if best < best_so_far {
                best_so_far = best;
                interface.post(Message::BetterSolution {
                    algorithm: NAME,
                    generation: generation + 1,
                    fitness: best,
                    permutation: population[best_index].clone(),
                });
            }
        }

        let best_index = argmin(&fitness);
        let elapsed = start.elapsed().as_millis() as u64;
        interface.post(Message::Elapsed {
            algorithm: NAME,
            time: elapsed,
        });
        Ok(OptimizationResult {
            algorithm: NAME.to_string(),
            permutation: population.swap_remove(best_index),
            fitness: fitness[best_index],
            trace,
            elapsed,
        })
    }

    /// 不放回地抽取 `tournament_size` 个个体，返回其中适应度最低者的下标
    pub fn tournament<R: Rng + ?Sized>(&self, fitness: &[f64], rng: &mut R) -> usize {
        sample(rng, fitness.len(), self.tournament_size)
            .into_iter()
            .min_by(|&a, &b| fitness[a].total_cmp(&fitness[b]))
            .unwrap_or(0)
    }

    fn breed<X: Crossover, R: Rng + ?Sized>(
        &self,
        parent1: &Permutation,
        parent2: &Permutation,
        crossover: &X,
        constraints: &Constraints,
        rng: &mut R,
    ) -> Permutation {
        if rng.random::<f64>() >= self.crossover_rate {
            return parent1.clone();
        }
        crossover
            .crossover(parent1, parent2, constraints, rng)
            .unwrap_or_else(|| {
                debug!("杂交尝试次数用尽，子代直接复制父代一");
                parent1.clone()
            })
    }
}

fn evaluate_all<O: Objective>(objective: &O, population: &[Permutation]) -> Vec<f64> {
    population.iter().map(|x| objective.evaluate(x)).collect()
}
