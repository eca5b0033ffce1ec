//! Cell and line model for a single 3x3 grid.
//!
//! A [`SubBoard`] is used both for the nine local grids and for the meta
//! board recording who won each of them.

use std::fmt;

use crate::constants::{CELLS, DIRECTIONS, SIDE, SYMBOL_COMPUTER, SYMBOL_EMPTY, SYMBOL_PLAYER};

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Computer,
    Player,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Computer => Color::Player,
            Color::Player => Color::Computer,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Computer => write!(f, "computer"),
            Color::Player => write!(f, "player"),
        }
    }
}

/// Occupancy of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Computer,
    Player,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => SYMBOL_EMPTY,
            Cell::Computer => SYMBOL_COMPUTER,
            Cell::Player => SYMBOL_PLAYER,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Computer => Some(Color::Computer),
            Cell::Player => Some(Color::Player),
        }
    }
}

impl From<Color> for Cell {
    fn from(c: Color) -> Self {
        match c {
            Color::Computer => Cell::Computer,
            Color::Player => Cell::Player,
        }
    }
}

/// A 3x3 grid addressed by `(i, j)` where `i` is the column and `j` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubBoard {
    cells: [Cell; CELLS],
    empty: usize,
}

impl Default for SubBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubBoard {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
            empty: CELLS,
        }
    }

    #[inline]
    fn idx(i: usize, j: usize) -> usize {
        i + j * SIDE
    }

    /// Cell at `(i, j)`; anything outside the grid reads as empty.
    pub fn get(&self, i: isize, j: isize) -> Cell {
        if i < 0 || j < 0 || i >= SIDE as isize || j >= SIDE as isize {
            return Cell::Empty;
        }
        self.cells[Self::idx(i as usize, j as usize)]
    }

    /// Cell at an in-range `(i, j)`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> Cell {
        self.cells[Self::idx(i, j)]
    }

    /// Occupy `(i, j)` with `c`. Returns `false` without mutating if occupied.
    pub fn set_chess(&mut self, i: usize, j: usize, c: Color) -> bool {
        let idx = Self::idx(i, j);
        if self.cells[idx] != Cell::Empty {
            return false;
        }
        self.cells[idx] = c.into();
        self.empty -= 1;
        true
    }

    /// Clear `(i, j)`. Only used to roll back a simulated move.
    pub fn erase(&mut self, i: usize, j: usize) {
        let idx = Self::idx(i, j);
        if self.cells[idx] != Cell::Empty {
            self.empty += 1;
        }
        self.cells[idx] = Cell::Empty;
    }

    pub fn full(&self) -> bool {
        self.empty == 0
    }

    pub fn empty_count(&self) -> usize {
        self.empty
    }

    pub fn count(&self, c: Color) -> usize {
        let cell = Cell::from(c);
        self.cells.iter().filter(|&&x| x == cell).count()
    }

    /// Number of maximal runs of exactly `len` cells owned by `c`.
    ///
    /// Every cell is tried as the start of a run in each of the four
    /// directions. A run counts only when it cannot be extended backwards or
    /// forwards, so a full row counts once for `len == 3` and zero times for
    /// `len == 2`.
    pub fn has(&self, len: usize, c: Color) -> usize {
        let cell = Cell::from(c);
        let len = len as isize;
        let mut sum = 0;
        for j in 0..SIDE as isize {
            for i in 0..SIDE as isize {
                for &(di, dj) in &DIRECTIONS {
                    if self.get(i - di, j - dj) == cell {
                        continue;
                    }
                    if self.get(i + len * di, j + len * dj) == cell {
                        continue;
                    }
                    if (0..len).all(|k| self.get(i + k * di, j + k * dj) == cell) {
                        sum += 1;
                    }
                }
            }
        }
        sum
    }

    /// Iterator over the coordinates of empty cells, column by column.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIDE)
            .flat_map(|i| (0..SIDE).map(move |j| (i, j)))
            .filter(move |&(i, j)| self.at(i, j) == Cell::Empty)
    }
}

impl fmt::Display for SubBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for j in 0..SIDE {
            for i in 0..SIDE {
                write!(f, "{} ", self.at(i, j).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
