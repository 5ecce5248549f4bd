//! Subcommands and the game flags they share

pub mod compare;
pub mod enumerate;
pub mod sample;

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    config::{self, GameDescriptor, GameParameters, MNK_GAME_NAME, RulesDescriptor},
    mnk::MnkGame,
};

/// Game selection: a JSON descriptor file or inline flags
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// JSON game descriptor; overrides every other game flag
    #[arg(long)]
    pub game: Option<PathBuf>,

    /// Board rows
    #[arg(short = 'm', long, default_value_t = 3)]
    pub rows: usize,

    /// Board columns
    #[arg(short = 'n', long, default_value_t = 3)]
    pub cols: usize,

    /// Base win length
    #[arg(long = "win-length", default_value_t = 3)]
    pub win_length: usize,

    /// Completing a line loses instead of wins
    #[arg(long)]
    pub misere: bool,

    /// Extra win length for X (may be negative)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub x_extra_k: i64,

    /// Extra win length for O (may be negative)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub o_extra_k: i64,

    /// Placements X makes on its opening turn
    #[arg(long, default_value_t = 1)]
    pub x_opening: usize,

    /// Placements O makes on its opening turn
    #[arg(long, default_value_t = 1)]
    pub o_opening: usize,

    /// Line directions counting for X (comma separated: h,v,d1,d2)
    #[arg(long, value_delimiter = ',')]
    pub x_directions: Option<Vec<String>>,

    /// Line directions counting for O (comma separated: h,v,d1,d2)
    #[arg(long, value_delimiter = ',')]
    pub o_directions: Option<Vec<String>>,
}

impl GameArgs {
    /// Descriptor equivalent to the flags, or the one loaded from `--game`
    pub fn descriptor(&self) -> Result<GameDescriptor> {
        if let Some(path) = &self.game {
            return config::load_json(path)
                .with_context(|| format!("loading game descriptor {}", path.display()));
        }

        let mut allowed_directions = BTreeMap::new();
        if let Some(keys) = &self.x_directions {
            allowed_directions.insert(0, keys.clone());
        }
        if let Some(keys) = &self.o_directions {
            allowed_directions.insert(1, keys.clone());
        }

        Ok(GameDescriptor {
            name: MNK_GAME_NAME.to_string(),
            parameters: GameParameters {
                m: self.rows,
                n: self.cols,
                k: self.win_length,
                rules: RulesDescriptor {
                    opening_moves: BTreeMap::from([(0, self.x_opening), (1, self.o_opening)]),
                    misere: self.misere,
                    allowed_directions,
                    p0_extra_k: self.x_extra_k,
                    p1_extra_k: self.o_extra_k,
                },
            },
        })
    }

    pub fn build(&self) -> Result<MnkGame> {
        let descriptor = self.descriptor()?;
        descriptor.build().context("building game")
    }
}

/// Human-readable summary of a game's rules
pub fn describe_game(game: &MnkGame) -> Vec<(&'static str, String)> {
    use crate::mnk::Player;

    let directions = |player: Player| {
        game.valid_directions(player)
            .iter()
            .map(|d| d.key())
            .collect::<Vec<_>>()
            .join(",")
    };
    vec![
        ("board", format!("{}x{}", game.rows(), game.cols())),
        (
            "win length",
            format!("X={} O={}", game.win_length(Player::X), game.win_length(Player::O)),
        ),
        (
            "directions",
            format!("X={} O={}", directions(Player::X), directions(Player::O)),
        ),
        (
            "opening moves",
            format!(
                "X={} O={}",
                game.rules().opening_moves(Player::X),
                game.rules().opening_moves(Player::O)
            ),
        ),
        ("misere", game.is_misere().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::mnk::{Direction, Player};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        game: GameArgs,
    }

    #[test]
    fn test_default_flags_build_tic_tac_toe() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.game.build().unwrap(), MnkGame::tic_tac_toe());
    }

    #[test]
    fn test_flags_map_to_rules() {
        let cli = TestCli::parse_from([
            "test",
            "-m",
            "4",
            "-n",
            "4",
            "--win-length",
            "3",
            "--o-extra-k",
            "1",
            "--o-opening",
            "2",
            "--x-directions",
            "h,v",
        ]);
        let game = cli.game.build().unwrap();
        assert_eq!(game.win_length(Player::O), 4);
        assert_eq!(game.rules().opening_moves(Player::O), 2);
        assert_eq!(
            game.valid_directions(Player::X),
            &[Direction::Horizontal, Direction::Vertical]
        );
    }

    #[test]
    fn test_game_file_overrides_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{"name": "mnk_game", "parameters": {"m": 5, "n": 5, "k": 4}}"#)
            .unwrap();
        let cli = TestCli::parse_from(["test", "--game", path.to_str().unwrap(), "-m", "3"]);
        let game = cli.game.build().unwrap();
        assert_eq!((game.rows(), game.win_length(Player::X)), (5, 4));
    }
}
