//! Search-based policy: exact minimax values over the rule engine.
//!
//! Values are kept from X's point of view and memoised per game definition
//! by canonical key and remaining depth. Because turns can span several moves under opening
//! allotments, the maximising side is read from each state rather than
//! alternated.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::{
    mnk::{GameState, MnkGame, Player},
    ports::Policy,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxParams {
    /// Search horizon in plies; positions past it score as neutral
    pub max_depth: Option<usize>,
}

type Memo = HashMap<(String, Option<usize>), f64>;

/// One memo table per game definition seen so far
#[derive(Debug, Default)]
struct MemoTables {
    tables: Vec<(MnkGame, Memo)>,
}

impl MemoTables {
    fn for_game(&mut self, game: &MnkGame) -> &mut Memo {
        let index = match self.tables.iter().position(|(g, _)| g == game) {
            Some(index) => index,
            None => {
                self.tables.push((game.clone(), Memo::new()));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index].1
    }

    fn len(&self) -> usize {
        self.tables.iter().map(|(_, memo)| memo.len()).sum()
    }
}

/// Puts all its mass on the value-maximising actions
#[derive(Debug)]
pub struct MinimaxPolicy {
    name: String,
    params: MinimaxParams,
    cache: Mutex<MemoTables>,
}

impl MinimaxPolicy {
    pub fn new(params: MinimaxParams) -> Self {
        Self {
            name: "minimax".to_string(),
            params,
            cache: Mutex::new(MemoTables::default()),
        }
    }

    pub fn params(&self) -> &MinimaxParams {
        &self.params
    }

    /// Value of every legal action from the mover's point of view
    pub fn evaluate_actions(&self, state: &GameState) -> Vec<(usize, f64)> {
        let mover = state.current_player();
        let remaining = self.params.max_depth.map(|d| d.saturating_sub(1));
        let mut tables = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let cache = tables.for_game(state.game());

        let mut values = Vec::new();
        for action in state.legal_actions() {
            if let Ok(next_state) = state.child(action) {
                let value = minimax(&next_state, remaining, cache);
                values.push((action, perspective(value, mover)));
            }
        }
        values
    }

    /// Number of memoised positions across all games
    pub fn cache_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MinimaxPolicy {
    fn default() -> Self {
        Self::new(MinimaxParams::default())
    }
}

impl Policy for MinimaxPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts_opponent_inference(&self) -> bool {
        true
    }

    fn action_likelihoods(&self, state: &GameState) -> BTreeMap<usize, f64> {
        if self.params.max_depth == Some(0) {
            return state.legal_actions().into_iter().map(|a| (a, 1.0)).collect();
        }
        let values = self.evaluate_actions(state);
        let Some(best) = values.iter().map(|&(_, v)| v).reduce(f64::max) else {
            return BTreeMap::new();
        };
        values
            .into_iter()
            .map(|(action, v)| (action, if v == best { 1.0 } else { 0.0 }))
            .collect()
    }
}

fn perspective(value: f64, player: Player) -> f64 {
    match player {
        Player::X => value,
        Player::O => -value,
    }
}

fn minimax(state: &GameState, remaining: Option<usize>, cache: &mut Memo) -> f64 {
    if state.is_terminal() {
        return state.player_return(Player::X);
    }
    if remaining == Some(0) {
        return 0.0;
    }

    let key = (state.encode(), remaining);
    if let Some(&value) = cache.get(&key) {
        return value;
    }

    let maximizing = state.current_player() == Player::X;
    let next_remaining = remaining.map(|r| r - 1);
    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for action in state.legal_actions() {
        if let Ok(next_state) = state.child(action) {
            let value = minimax(&next_state, next_remaining, cache);
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
    }

    cache.insert(key, best);
    best
}
