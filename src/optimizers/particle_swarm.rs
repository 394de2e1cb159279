//! 排列空间上的粒子群算法
//!
//! 粒子的位置是一个排列，速度是一个交换序列。每一代先更新个体最优和全局最优，
//! 再由惯性、认知、社会三部分交换序列拼接出新的速度，作用到当前位置上。

use super::{argmin, OptimizationResult};
use crate::constraints::Constraints;
use crate::interfaces::{Interface, Message};
use crate::objectives::Objective;
use crate::operators::initialization::{initialize_population, DEFAULT_MAX_ATTEMPTS};
use crate::operators::swaps::{apply_swaps, sample_ordered, scaled_amount, swap_sequence};
use crate::{Error, Node, Permutation, Swap};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Instant;

pub const NAME: &str = "particle_swarm";

/// 新位置违反先后约束时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairPolicy {
    /// 回到个体最优的位置，新速度照常保留
    RevertToBest,
    /// 放弃这一步，位置和速度都保持上一代的值
    #[default]
    DiscardMove,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Permutation,
    pub velocity: Vec<Swap>,
    pub best_position: Permutation,
    pub best_fitness: f64,
}

impl Particle {
    pub fn new(position: Permutation, fitness: f64) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity: vec![],
            best_fitness: fitness,
        }
    }

    /// 严格改进时更新个体最优
    pub fn update_best(&mut self, fitness: f64) -> bool {
        if fitness < self.best_fitness {
            self.best_position.clone_from(&self.position);
            self.best_fitness = fitness;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSwarm {
    pub swarm_size: usize,
    pub generations: usize,
    /// 惯性权重
    pub w: f64,
    /// 认知权重
    pub c1: f64,
    /// 社会权重
    pub c2: f64,
    pub repair: RepairPolicy,
    pub max_initial_attempts: usize,
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self {
            swarm_size: 50,
            generations: 100,
            w: 0.4,
            c1: 1.5,
            c2: 1.5,
            repair: RepairPolicy::default(),
            max_initial_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ParticleSwarm {
    pub fn validate(&self) -> Result<(), Error> {
        if self.swarm_size == 0 {
            return Err(Error::configuration("粒子数目至少为 1"));
        }
        for (name, value) in [("w", self.w), ("c1", self.c1), ("c2", self.c2)] {
            if value < 0.0 || !value.is_finite() {
                return Err(Error::configuration(format!(
                    "权重 {name} 应当是非负有限数，实际为 {value}"
                )));
            }
        }
        Ok(())
    }

    /// 粒子群算法求解的主函数
    pub fn optimize<O: Objective, R: Rng + ?Sized>(
        &self,
        objective: &O,
        interface: &dyn Interface,
        rng: &mut R,
    ) -> Result<OptimizationResult, Error> {
        self.validate()?;
        let start = Instant::now();
        let constraints = objective.constraints();
        let mut swarm: Vec<Particle> =
            initialize_population(constraints, self.swarm_size, self.max_initial_attempts, rng)
                .into_iter()
                .map(|position| {
                    let fitness = objective.evaluate(&position);
                    Particle::new(position, fitness)
                })
                .collect();
        let initial: Vec<f64> = swarm.iter().map(|p| p.best_fitness).collect();
        let leader = argmin(&initial);
        let mut global_best_position = swarm[leader].best_position.clone();
        let mut global_best_fitness = swarm[leader].best_fitness;
        interface.post(Message::Initialized {
            algorithm: NAME,
            size: swarm.len(),
            best_fitness: global_best_fitness,
        });
        let mut trace = Vec::with_capacity(self.generations + 1);
        trace.push(global_best_fitness);

        for generation in 0..self.generations {
            let mut improved = false;
            for particle in &mut swarm {
                let fitness = objective.evaluate(&particle.position);
                particle.update_best(fitness);
                if fitness < global_best_fitness {
                    global_best_fitness = fitness;
                    global_best_position.clone_from(&particle.position);
                    improved = true;
                }
            }
            for particle in &mut swarm {
                let velocity = self.velocity(particle, &global_best_position, rng);
                self.advance(particle, velocity, constraints);
            }
            trace.push(global_best_fitness);
            debug!(
                "粒子群算法第 {} 代：全局最优适应度 {global_best_fitness}",
                generation + 1
            );
            interface.post(Message::Progress {
                algorithm: NAME,
                generation: generation + 1,
                best_fitness: global_best_fitness,
            });
            if improved {
                interface.post(Message::BetterSolution {
                    algorithm: NAME,
                    generation: generation + 1,
                    fitness: global_best_fitness,
                    permutation: global_best_position.clone(),
                });
            }
        }

        let elapsed = start.elapsed().as_millis() as u64;
        interface.post(Message::Elapsed {
            algorithm: NAME,
            time: elapsed,
        });
        Ok(OptimizationResult {
            algorithm: NAME.to_string(),
            permutation: global_best_position,
            fitness: global_best_fitness,
            trace,
            elapsed,
        })
    }

    /// 依次拼接惯性、认知、社会三部分交换序列，每一部分都是从对应序列中保序抽取的子序列
    pub fn velocity<R: Rng + ?Sized>(
        &self,
        particle: &Particle,
        global_best: &[Node],
        rng: &mut R,
    ) -> Vec<Swap> {
        let inertia = &particle.velocity;
        let amount = scaled_amount(self.w, inertia.len());
        let mut velocity = sample_ordered(inertia, amount, rng);

        let cognitive = swap_sequence(&particle.position, &particle.best_position);
        let amount = scaled_amount(self.c1 * rng.random::<f64>(), cognitive.len());
        velocity.extend(sample_ordered(&cognitive, amount, rng));

        let social = swap_sequence(&particle.position, global_best);
        let amount = scaled_amount(self.c2 * rng.random::<f64>(), social.len());
        velocity.extend(sample_ordered(&social, amount, rng));
        velocity
    }

    /// 把速度作用到粒子上，新位置不可行时按 `repair` 处理
    pub fn advance(&self, particle: &mut Particle, velocity: Vec<Swap>, constraints: &Constraints) {
        let mut position = particle.position.clone();
        apply_swaps(&mut position, &velocity);
        if constraints.respects(&position) {
            particle.position = position;
            particle.velocity = velocity;
            return;
        }
        match self.repair {
            RepairPolicy::RevertToBest => {
                particle.position.clone_from(&particle.best_position);
                particle.velocity = velocity;
            }
            RepairPolicy::DiscardMove => {}
        }
    }
}
