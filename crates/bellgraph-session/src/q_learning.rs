use bellgraph_core::{ConfigError, GraphStore, QTable, StateId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::simulator::{Episode, EpisodeStep, GraphSimulator};

/// Settings for sampled, epsilon-greedy tabular Q-learning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub max_episode_steps: usize,
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            max_episode_steps: 100,
            seed: 0,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1]")));
            }
        }
        if self.max_episode_steps == 0 {
            return Err(ConfigError::Invalid(
                "max_episode_steps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Learns Q-values from sampled transitions instead of full sweeps.
///
/// `Q(s,a) <- Q(s,a) + alpha * (r + gamma * max(0, max_a' Q(s',a')) - Q(s,a))`
///
/// The zero floor on the successor matches the Bellman engine, so both converge
/// to the same table on deterministic graphs.
pub struct QLearner {
    config: QLearningConfig,
    table: QTable,
    simulator: GraphSimulator,
    episodes: usize,
}

impl QLearner {
    pub fn new(graph: &GraphStore, config: QLearningConfig) -> Self {
        QLearner {
            config,
            table: QTable::initialized(graph),
            simulator: GraphSimulator::new(graph, config.seed),
            episodes: 0,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Run one epsilon-greedy episode from `start`, updating the table after every step.
    pub fn run_episode(&mut self, start: StateId) -> Episode {
        let mut steps = Vec::new();
        let mut state = start;
        let mut total_return = 0.0;
        let mut discount = 1.0;
        let mut terminated = self.simulator.model().is_terminal(start);

        while !terminated && steps.len() < self.config.max_episode_steps {
            let Some(action_id) = self.select_action(state) else {
                terminated = true;
                break;
            };
            let Some(action) = self
                .simulator
                .model()
                .action_label(state, action_id)
                .map(str::to_string)
            else {
                terminated = true;
                break;
            };

            let (next_state, reward, next_terminal) = self.simulator.step(state, action_id);
            let current = self.table.get(state, &action).unwrap_or(0.0);
            let target = reward + self.config.gamma * self.table.max_next_q(next_state);
            self.table
                .set(state, action.clone(), current + self.config.alpha * (target - current));

            total_return += discount * reward;
            discount *= self.config.gamma;
            steps.push(EpisodeStep {
                state,
                action,
                next_state,
                reward,
            });

            state = next_state;
            terminated = next_terminal;
        }

        self.episodes += 1;
        debug!(
            episode = self.episodes,
            steps = steps.len(),
            total_return,
            "finished Q-learning episode"
        );

        Episode {
            steps,
            total_return,
            terminated,
        }
    }

    /// Run `episodes` episodes from `start` and return their discounted returns.
    pub fn train(&mut self, start: StateId, episodes: usize) -> Vec<f64> {
        (0..episodes)
            .map(|_| self.run_episode(start).total_return)
            .collect()
    }

    fn select_action(&mut self, state: StateId) -> Option<usize> {
        if self.simulator.uniform() < self.config.epsilon {
            self.simulator.random_action(state)
        } else {
            self.simulator.greedy_action(&self.table, state)
        }
    }
}
