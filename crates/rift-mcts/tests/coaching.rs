use rift_core::{LanePosition, LaneState, WavePosition};
use rift_mcts::{
    CoachError, EnemyModel, LaneAction, SearchConfig, legal_actions, plan, recommend,
    recommend_parallel,
};

fn config(iterations: usize, seed: u64) -> SearchConfig {
    SearchConfig {
        iterations,
        seed,
        ..SearchConfig::default()
    }
}

#[test]
fn every_iteration_lands_on_exactly_one_root_child() {
    let state = LaneState::default();
    let result = recommend(&state, &config(500, 3), EnemyModel::Average).unwrap();
    let visits: u64 = result.action_scores.values().map(|s| s.visits).sum();
    assert_eq!(visits, 500);
    assert_eq!(result.iterations_run, 500);
}

#[test]
fn scored_actions_are_all_legal_in_the_root_state() {
    let state = LaneState::default();
    let legal: Vec<&str> = legal_actions(&state)
        .into_iter()
        .map(LaneAction::as_str)
        .collect();
    let result = recommend(&state, &config(300, 17), EnemyModel::Passive).unwrap();
    for action in result.action_scores.keys() {
        assert!(legal.contains(&action.as_str()), "illegal action {action}");
    }
}

#[test]
fn visit_shares_sum_to_one_hundred_percent() {
    let state = LaneState::default();
    let result = recommend(&state, &config(400, 8), EnemyModel::Average).unwrap();
    let sum: f64 = result.action_scores.values().map(|s| s.visit_pct).sum();
    assert!((sum - 100.0).abs() < 0.5, "visit_pct sums to {sum}");
}

#[test]
fn same_seed_gives_the_same_recommendation() {
    let state = LaneState::default();
    let a = recommend(&state, &config(300, 42), EnemyModel::Average).unwrap();
    let b = recommend(&state, &config(300, 42), EnemyModel::Average).unwrap();
    assert_eq!(a.recommended, b.recommended);
    assert_eq!(a.confidence, b.confidence);
    assert_eq!(a.next_2_min, b.next_2_min);
}

#[test]
fn losing_lane_against_a_sharp_enemy_plays_defensive() {
    let state = LaneState {
        my_hp: 120.0,
        my_level: 3,
        my_xp_to_next: 400.0,
        my_position: LanePosition::Extended,
        enemy_hp: 540.0,
        enemy_level: 5,
        enemy_combat_power: 160.0,
        wave_position: WavePosition::PushingToMe,
        game_time: 420.0,
        ..LaneState::default()
    };
    let result = recommend(&state, &config(500, 1), EnemyModel::Optimal).unwrap();
    assert_ne!(result.recommended, LaneAction::AllIn);
    assert!(
        matches!(
            result.recommended,
            LaneAction::BackOff
                | LaneAction::Recall
                | LaneAction::FarmSafe
                | LaneAction::FreezeWave
                | LaneAction::ResetWave
                | LaneAction::WardRiver
        ),
        "expected a defensive action, got {:?}",
        result.recommended
    );
}

#[test]
fn confidence_label_embeds_the_winning_visit_share() {
    let state = LaneState::default();
    let result = recommend(&state, &config(500, 12), EnemyModel::Average).unwrap();
    let best_visits = result
        .action_scores
        .values()
        .map(|s| s.visits)
        .max()
        .unwrap_or(0);
    let share = best_visits as f64 / 500.0;
    let expected = if share >= 0.60 {
        "HIGH"
    } else if share >= 0.35 {
        "MEDIUM"
    } else {
        "LOW"
    };
    assert!(
        result.confidence.starts_with(expected),
        "share {share} produced label {}",
        result.confidence
    );
    assert!(result.confidence.contains('%'));
}

#[test]
fn expired_time_budget_returns_best_so_far() {
    let state = LaneState::default();
    let cfg = SearchConfig {
        iterations: 5_000_000,
        time_budget_ms: Some(5),
        ..SearchConfig::default()
    };
    let result = recommend(&state, &cfg, EnemyModel::Average).unwrap();
    assert!(result.iterations_run < 5_000_000);
    let visits: u64 = result.action_scores.values().map(|s| s.visits).sum();
    assert_eq!(visits as usize, result.iterations_run);
}

#[test]
fn validation_failure_comes_back_before_any_search() {
    let state = LaneState {
        my_level: 0,
        ..LaneState::default()
    };
    let err = recommend(&state, &config(100, 0), EnemyModel::Average);
    assert!(matches!(err, Err(CoachError::Validation(_))));
}

#[test]
fn plan_projects_forward_one_recommendation_per_step() {
    let state = LaneState::default();
    let result = plan(&state, 3, &config(100, 6), EnemyModel::Average).unwrap();
    assert_eq!(result.steps.len(), 3);
    for step in &result.steps {
        assert!(!step.do_this.is_empty());
        assert!(!step.action_scores.is_empty());
    }
}

#[test]
fn parallel_search_spends_the_whole_budget_across_workers() {
    let state = LaneState::default();
    let result = recommend_parallel(&state, &config(600, 4), EnemyModel::Average, 3).unwrap();
    let visits: u64 = result.action_scores.values().map(|s| s.visits).sum();
    assert_eq!(visits, 600);
    assert_eq!(result.iterations_run, 600);
}

#[test]
fn recommendation_text_is_fully_populated() {
    let state = LaneState::default();
    let result = recommend(&state, &config(300, 21), EnemyModel::Average).unwrap();
    assert!(!result.do_this.is_empty());
    assert!(result.why.ends_with('.'));
    assert!(result.watch_for.starts_with("Watch "));
    assert!(result.plan_changes_if.starts_with("Plan changes if: "));
    assert!(!result.next_2_min.is_empty());
    assert!(!result.position_advice.is_empty());
}
