use std::fs;

use mnk_lab::{
    comparison::Experiment,
    config::{self, ExperimentConfig, GameDescriptor, PolicyConfig, SamplerConfig},
    dataset::{OutcomeLabel, Predicate, StateDataset, build_sampler},
    inference::{InferenceMethod, OpponentInference},
    mnk::{GameState, LineAnalyzer, MnkGame},
    policies::{MinimaxPolicy, load_policies},
    ports::Policy,
};
use rand::{SeedableRng, rngs::StdRng};

const EXPERIMENT: &str = r#"{
    "experiment_name": "tic_tac_toe_midgame",
    "description": "random vs heuristics on mid-game positions",
    "game": {"name": "mnk_game", "parameters": {"m": 3, "n": 3, "k": 3}},
    "policies": [
        {"name": "random"},
        {"name": "intuitive_gamer", "parameters": {
            "beta": 2.0,
            "opponent_inference": {
                "enabled": true,
                "method": "log_likelihood",
                "candidate_policies": [{"name": "random"}, {"name": "minimax"}]
            }
        }},
        {"name": "minimax"},
        {"name": "random"},
        {"name": "mcts"}
    ],
    "sampler": {
        "predicates": ["freespace >= 4", "not terminal", "num_turns >= 3 and", "bogus > 1"],
        "sample": {"k": 25, "replace": false}
    },
    "seed": 17
}"#;

#[test]
fn experiment_runs_end_to_end_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiment.json");
    fs::write(&path, EXPERIMENT).unwrap();

    let config: ExperimentConfig = config::load_json(&path).unwrap();
    let experiment = Experiment::from_config(&config).unwrap();

    let ids: Vec<&str> = experiment.policies().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["random", "intuitive_gamer", "minimax", "random_3"]);

    // Two predicates apply, the malformed and unknown-field ones are dropped
    assert_eq!(experiment.sampler().predicates().len(), 2);
    let expected = 1 + 9 + 72 + 252 + 756 + 1260;
    let terminal_early = StateDataset::generate(&MnkGame::tic_tac_toe(), Some(5))
        .unwrap()
        .iter()
        .filter(|r| r.state.is_terminal())
        .count();
    assert_eq!(experiment.sampler().len(), expected - terminal_early);

    let report = experiment.run_seeded(config.seed);
    assert_eq!(report.sampled, 25);
    assert_eq!(report.pairwise.states, 25);
    assert_eq!(report.pairwise.get("random", "random_3"), Some(1.0));
    for id in &ids {
        assert_eq!(report.pairwise.get(id, id), Some(1.0));
    }

    let again = experiment.run_seeded(config.seed);
    assert_eq!(report.pairwise, again.pairwise);
    assert_eq!(report.max_action, again.max_action);

    assert_eq!(experiment.policies()[1].inference.as_ref().map(|m| m.candidates().len()), Some(2));
    assert_eq!(report.opponent_models.len(), 1);
    assert_eq!(report.opponent_models["intuitive_gamer"], vec!["random", "minimax"]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["experiment_name"], "tic_tac_toe_midgame");
}

#[test]
fn bare_labels_select_the_labelled_records() {
    let dataset = StateDataset::generate(&MnkGame::tic_tac_toe(), None).unwrap();
    let view = dataset.view();

    let winning = view.where_expr(&Predicate::parse("outcome == winning").unwrap());
    let expected = dataset.iter().filter(|r| r.outcome == OutcomeLabel::Winning).count();
    assert!(expected > 0);
    assert_eq!(winning.len(), expected);

    let x_to_move = Predicate::parse("current_player == X").unwrap();
    assert!(x_to_move.evaluate(&dataset.records()[0]).unwrap());
    let x_view = view.try_where(|r| x_to_move.evaluate(r)).unwrap();
    assert_eq!(
        x_view.len(),
        dataset.iter().filter(|r| r.current_player == mnk_lab::Player::X).count()
    );
}

#[test]
fn sampler_switches_to_replacement_when_short() {
    let config = SamplerConfig::default()
        .with_max_depth(Some(2))
        .with_predicate("num_turns == 1 and current_player == \"O\"")
        .with_sample(50, false);
    let sampler = build_sampler(&config, &MnkGame::tic_tac_toe()).unwrap();
    assert_eq!(sampler.len(), 9);
    assert!(sampler.replace());
    let samples = sampler.samples(&mut StdRng::seed_from_u64(8));
    assert_eq!(samples.len(), 50);
    assert!(samples.iter().all(|r| r.ply == 1));
}

#[test]
fn game_descriptor_variants_enumerate() {
    let descriptor: GameDescriptor = serde_json::from_str(
        r#"{"name": "mnk_game", "parameters": {"m": 3, "n": 3, "k": 3,
            "rules": {"allowed_directions": {"0": ["h", "v", "zigzag"]}, "p1_extra_k": 0}}}"#,
    )
    .unwrap();
    let game = descriptor.build().unwrap();
    assert_eq!(game.valid_directions(mnk_lab::Player::X).len(), 2);
    let dataset = StateDataset::generate(&game, Some(4)).unwrap();
    // No line can be completed in four plies, so the shape matches plain tic-tac-toe
    assert_eq!(dataset.len(), 1 + 9 + 72 + 252 + 756);
}

#[test]
fn minimax_ranks_every_immediate_win_as_best() {
    let game = MnkGame::tic_tac_toe();
    let dataset = StateDataset::generate(&game, None).unwrap();
    let minimax = MinimaxPolicy::default();

    for record in dataset.iter().filter(|r| !r.state.is_terminal() && r.ply >= 4) {
        let mover = record.current_player;
        let wins = LineAnalyzer::winning_moves(
            record.state.board(),
            mover,
            game.win_length(mover),
            game.valid_directions(mover),
        );
        if wins.is_empty() {
            continue;
        }
        let best = minimax.best_actions(&record.state);
        assert!(
            wins.iter().all(|a| best.contains(a)),
            "state {} best {best:?} wins {wins:?}",
            record.state.encode()
        );
    }
}

/// Play a game where O follows `o_policy` and X always takes the lowest
/// legal cell, returning O's decisions
fn o_history(o_policy: &dyn Policy) -> Vec<(GameState, usize)> {
    let mut state = MnkGame::tic_tac_toe().new_initial_state();
    let mut history = Vec::new();
    while !state.is_terminal() {
        let action = if state.current_player() == mnk_lab::Player::O {
            let action = o_policy.best_actions(&state)[0];
            history.push((state.clone(), action));
            action
        } else {
            state.legal_actions()[0]
        };
        state.apply_action(action).unwrap();
    }
    history
}

#[test]
fn inference_identifies_minimax_opponent() {
    let history = o_history(&MinimaxPolicy::default());
    assert!(!history.is_empty());

    let candidates = load_policies(&[PolicyConfig::new("random"), PolicyConfig::new("minimax")])
        .unwrap();
    let inference = OpponentInference::new(candidates, InferenceMethod::LogLikelihood);
    let posterior = inference.calculate_likelihoods(&history);
    assert!(posterior["minimax"] > posterior["random"]);
    assert!((posterior.values().sum::<f64>() - 1.0).abs() < 1e-9);
}
