//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on an M,N,K board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Owner of the cell, if any
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game. `X` is player 0 and always opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::X, Player::O];

    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Numeric player id (0 for X, 1 for O)
    pub fn index(self) -> usize {
        match self {
            Player::X => 0,
            Player::O => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::X),
            1 => Some(Player::O),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Row-major grid of cells.
///
/// Cells are addressed either by flat index (`row * cols + col`), which is
/// also the action encoding, or by signed coordinates when walking lines so
/// that stepping off the board is a cheap bounds check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Parse a board from rows separated by `/` or newlines, e.g. `"XO./.X./..."`.
    ///
    /// # Errors
    ///
    /// Returns error if rows have unequal lengths or contain an unknown character.
    pub fn from_rows(s: &str) -> Result<Self, crate::Error> {
        let rows: Vec<&str> = s
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        let cols = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.chars().count() != cols {
                return Err(crate::Error::InvalidConfiguration {
                    message: format!("ragged board rows in '{s}'"),
                });
            }
            for c in row.chars() {
                let cell = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidConfiguration {
                    message: format!("invalid cell character '{c}' in '{s}'"),
                })?;
                cells.push(cell);
            }
        }

        Ok(Board {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat index of a coordinate
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Coordinate of a flat index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Get cell at flat index
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Cell at a signed coordinate, `None` when off the board
    pub fn at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[self.index(row, col)])
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Copy of the board with one cell replaced
    #[must_use = "with_cell returns a new board; the original is unchanged"]
    pub fn with_cell(&self, index: usize, cell: Cell) -> Board {
        let mut board = self.clone();
        board.set(index, cell);
        board
    }

    /// Check if a cell is empty
    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells[index] == Cell::Empty
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Number of stones placed by a player
    pub fn count(&self, player: Player) -> usize {
        let target = player.to_cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// Rows of cell characters joined by `/`
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.rows);
        for (row, chunk) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if row > 0 {
                out.push('/');
            }
            out.extend(chunk.iter().map(|c| c.to_char()));
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}
