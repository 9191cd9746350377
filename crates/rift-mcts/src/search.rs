//! The MCTS loop: selection, expansion, rollout, backpropagation. One
//! rooted tree per call, discarded on return.

use std::time::{Duration, Instant};

use log::debug;
use rift_core::LaneState;
use rift_sim::DrawStream;

use crate::actions::{legal_actions, LaneAction};
use crate::config::SearchConfig;
use crate::error::CoachError;
use crate::node::{Node, Tree, ROOT};
use crate::policy::{self, EnemyModel};
use crate::scoring::{evaluate, score_transition, RewardWeights};
use crate::step::step_with_enemy;

/// Visit and reward statistics for one direct child of the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RootChildStats {
    pub action: LaneAction,
    pub visits: u64,
    pub total_reward: f64,
}

impl RootChildStats {
    pub(crate) fn avg_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }
}

/// Raw output of one search run, before explanation templating.
#[derive(Debug, Clone)]
pub(crate) struct SearchOutcome {
    pub root_children: Vec<RootChildStats>,
    pub iterations_run: usize,
    /// Most-visited path from the root, up to three actions deep.
    pub principal_line: Vec<LaneAction>,
}

impl SearchOutcome {
    /// Robust child: max visits, ties broken by average reward.
    pub(crate) fn best(&self) -> Option<RootChildStats> {
        self.root_children
            .iter()
            .copied()
            .max_by(|a, b| {
                a.visits.cmp(&b.visits).then(
                    a.avg_reward()
                        .partial_cmp(&b.avg_reward())
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
            })
    }

    /// Runner-up under the same ordering, used to phrase contingencies.
    pub(crate) fn second_best(&self) -> Option<RootChildStats> {
        let best = self.best()?;
        self.root_children
            .iter()
            .copied()
            .filter(|c| c.action != best.action)
            .max_by(|a, b| {
                a.visits.cmp(&b.visits).then(
                    a.avg_reward()
                        .partial_cmp(&b.avg_reward())
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
            })
    }

    pub(crate) fn total_visits(&self) -> u64 {
        self.root_children.iter().map(|c| c.visits).sum()
    }

    /// Merge another run's root statistics into this one by summation.
    pub(crate) fn merge(&mut self, other: &SearchOutcome) {
        for theirs in &other.root_children {
            match self
                .root_children
                .iter_mut()
                .find(|c| c.action == theirs.action)
            {
                Some(mine) => {
                    mine.visits += theirs.visits;
                    mine.total_reward += theirs.total_reward;
                }
                None => self.root_children.push(*theirs),
            }
        }
        self.iterations_run += other.iterations_run;
    }
}

/// Run one search and template the result into a recommendation.
pub fn recommend(
    state: &LaneState,
    config: &SearchConfig,
    model: EnemyModel,
) -> Result<crate::explain::MctsResult, CoachError> {
    let outcome = search(state, config, model, config.seed)?;
    Ok(crate::explain::explain(state, &outcome))
}

/// Run one seeded search to the iteration or wall-clock budget.
pub(crate) fn search(
    state: &LaneState,
    config: &SearchConfig,
    model: EnemyModel,
    seed: u64,
) -> Result<SearchOutcome, CoachError> {
    state.validate()?;
    config.validate()?;

    let mut draws = DrawStream::from_seed(seed);
    let mut tree = Tree::with_root(state.clone(), legal_actions(state));
    let deadline = config
        .time_budget_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));

    let mut iterations_run = 0;
    for _ in 0..config.iterations {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }
        run_iteration(&mut tree, config, model, &mut draws);
        iterations_run += 1;
    }
    debug!(
        "search done: {} iterations, {} nodes",
        iterations_run,
        tree.len()
    );

    let root_children = tree
        .get(ROOT)
        .children
        .iter()
        .map(|(action, child)| {
            let node = tree.get(*child);
            RootChildStats {
                action: *action,
                visits: node.visits,
                total_reward: node.total_reward,
            }
        })
        .collect();

    Ok(SearchOutcome {
        root_children,
        iterations_run,
        principal_line: principal_line(&tree),
    })
}

/// Follow the most-visited child from the root up to three levels deep.
fn principal_line(tree: &Tree) -> Vec<LaneAction> {
    let mut line = Vec::with_capacity(3);
    let mut node_id = ROOT;
    for _ in 0..3 {
        let node = tree.get(node_id);
        let Some((action, child)) = node
            .children
            .iter()
            .max_by(|(_, a), (_, b)| {
                let a = tree.get(*a);
                let b = tree.get(*b);
                a.visits.cmp(&b.visits).then(
                    a.avg_reward()
                        .partial_cmp(&b.avg_reward())
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
            })
            .copied()
        else {
            break;
        };
        line.push(action);
        node_id = child;
    }
    line
}

fn run_iteration(tree: &mut Tree, config: &SearchConfig, model: EnemyModel, draws: &mut DrawStream) {
    // Selection: descend while fully expanded.
    let mut node_id = ROOT;
    loop {
        let node = tree.get(node_id);
        if !node.untried.is_empty() || node.children.is_empty() {
            break;
        }
        match tree.best_child(node_id, config.exploration) {
            Some(child) => node_id = child,
            None => break,
        }
    }

    // Expansion: instantiate one untried action.
    if !tree.get(node_id).untried.is_empty() {
        let pick = draws.index(tree.get(node_id).untried.len());
        let action = tree.get_mut(node_id).untried.swap_remove(pick);
        let parent_state = tree.get(node_id).state.clone();
        let enemy_action = policy::enemy_response(model, &parent_state, draws);
        let child_state = step_with_enemy(&parent_state, action, enemy_action, model, draws);
        let untried = legal_actions(&child_state);
        let child = tree.allocate(Node {
            state: child_state,
            action: Some(action),
            parent: Some(node_id),
            children: Vec::new(),
            untried,
            visits: 0,
            total_reward: 0.0,
        });
        tree.get_mut(node_id).children.push((action, child));
        node_id = child;
    }

    let reward = rollout(
        &tree.get(node_id).state,
        config.rollout_depth,
        model,
        &config.reward,
        draws,
    );
    tree.backpropagate(node_id, reward);
}

/// Simulated continuation to the horizon: own action by the greedy
/// heuristic, enemy by the configured policy. Terminates early on death,
/// a recall, or an objective roam.
fn rollout(
    state: &LaneState,
    depth: usize,
    model: EnemyModel,
    weights: &RewardWeights,
    draws: &mut DrawStream,
) -> f64 {
    let mut total = 0.0;
    let mut current = state.clone();

    for _ in 0..depth {
        if current.my_hp <= 0.0 {
            total -= 50.0;
            break;
        }

        let legal = legal_actions(&current);
        let action = legal
            .iter()
            .copied()
            .max_by(|a, b| {
                policy::greedy_value(&current, *a)
                    .partial_cmp(&policy::greedy_value(&current, *b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(LaneAction::FarmSafe);
        let enemy_action = policy::enemy_response(model, &current, draws);
        let next = step_with_enemy(&current, action, enemy_action, model, draws);
        total += score_transition(&current, &next, weights);
        current = next;

        if matches!(
            action,
            LaneAction::Recall | LaneAction::RoamDragon | LaneAction::RoamHerald
        ) {
            break;
        }
    }

    total + evaluate(&current) * weights.horizon_eval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_counts_are_conserved_at_the_root() {
        let state = LaneState::default();
        let config = SearchConfig {
            iterations: 300,
            ..SearchConfig::default()
        };
        let outcome = search(&state, &config, EnemyModel::Average, 7).unwrap();
        assert_eq!(outcome.total_visits(), 300);
        assert_eq!(outcome.iterations_run, 300);
    }

    #[test]
    fn same_seed_reproduces_the_same_statistics() {
        let state = LaneState::default();
        let config = SearchConfig {
            iterations: 200,
            ..SearchConfig::default()
        };
        let a = search(&state, &config, EnemyModel::Average, 11).unwrap();
        let b = search(&state, &config, EnemyModel::Average, 11).unwrap();
        assert_eq!(a.root_children, b.root_children);
    }

    #[test]
    fn every_root_child_is_legal() {
        let state = LaneState::default();
        let config = SearchConfig {
            iterations: 150,
            ..SearchConfig::default()
        };
        let legal = legal_actions(&state);
        let outcome = search(&state, &config, EnemyModel::Passive, 3).unwrap();
        for child in &outcome.root_children {
            assert!(legal.contains(&child.action), "illegal {:?}", child.action);
        }
    }

    #[test]
    fn merge_sums_statistics() {
        let state = LaneState::default();
        let config = SearchConfig {
            iterations: 100,
            ..SearchConfig::default()
        };
        let mut a = search(&state, &config, EnemyModel::Average, 1).unwrap();
        let b = search(&state, &config, EnemyModel::Average, 2).unwrap();
        let before = a.total_visits();
        a.merge(&b);
        assert_eq!(a.total_visits(), before + b.total_visits());
        assert_eq!(a.iterations_run, 200);
    }

    #[test]
    fn invalid_state_is_rejected_before_searching() {
        let mut state = LaneState::default();
        state.my_hp_max = 0.0;
        let config = SearchConfig::default();
        assert!(search(&state, &config, EnemyModel::Average, 1).is_err());
    }
}
