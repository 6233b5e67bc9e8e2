use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Cell, Field, RevealState},
    error::{EngineError, Result},
    model::{BoardConfig, CellView, GameStatus, Pos, Tile},
};

/// Cells changed by a reveal and the status after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub updates: Vec<CellView>,
    pub status: GameStatus,
}

impl RevealOutcome {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// `None` when the toggle was ignored.
    pub cell: Option<CellView>,
    pub flag_count: usize,
}

impl ToggleOutcome {
    pub fn is_noop(&self) -> bool {
        self.cell.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    field: Field,
    mine_count: usize,
    mines_placed: bool,
    armed: bool,
    hidden_safe: usize,
    flag_count: usize,
    status: GameStatus,
    detonated: Option<Pos>,
}

impl Board {
    /// Allocates an all-hidden board without mines. Call [`Board::place_mines`] and
    /// [`Board::compute_adjacency`] before playing, or use [`Board::generate`].
    pub fn create(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            field: Field::new(config.rows, config.cols),
            mine_count: config.mines,
            mines_placed: false,
            armed: false,
            hidden_safe: 0,
            flag_count: 0,
            status: GameStatus::InProgress,
            detonated: None,
        })
    }

    /// A ready-to-play board seeded from the thread-local generator.
    pub fn new(config: BoardConfig) -> Result<Self> {
        Self::generate(config, &mut rand::rng())
    }

    pub fn generate<R: Rng>(config: BoardConfig, rng: &mut R) -> Result<Self> {
        let mut board = Self::create(config)?;
        board.place_mines(rng);
        board.compute_adjacency();
        info!(
            "Created {}x{} board with {} mines",
            config.rows, config.cols, config.mines
        );
        Ok(board)
    }

    /// Builds a ready-to-play board with mines at exactly `mines`. Duplicates count once.
    pub fn from_mines(rows: usize, cols: usize, mines: &[Pos]) -> Result<Self> {
        BoardConfig::new(rows, cols, 1).validate()?;

        let mut field = Field::new(rows, cols);
        for &pos in mines {
            let index = field.index(pos).ok_or(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            })?;
            field.cells[index].mine = true;
        }
        let mine_count = field.cells.iter().filter(|cell| cell.mine).count();

        let mut board = Self::create(BoardConfig::new(rows, cols, mine_count))?;
        board.field = field;
        board.mines_placed = true;
        board.compute_adjacency();
        Ok(board)
    }

    /// Marks `mine_count` distinct cells as mines, every subset equally likely.
    ///
    /// Walks the cells once and makes each a mine with probability
    /// `mines_left / cells_left`. Has no effect once mines are placed.
    pub fn place_mines<R: Rng>(&mut self, rng: &mut R) {
        if self.mines_placed {
            warn!("Mines already placed, ignoring placement request");
            return;
        }

        // validate() keeps the cell count within u32
        let total = self.field.cells.len();
        let mut mines_left = self.mine_count;
        for (cell, cells_left) in self.field.cells.iter_mut().zip((1..=total).rev()) {
            let mine = rng.random_ratio(mines_left as u32, cells_left as u32);
            cell.mine = mine;
            if mine {
                mines_left -= 1;
            }
        }

        self.mines_placed = true;
    }

    /// Fills in adjacency counts for the fixed mine layout and arms the board.
    pub fn compute_adjacency(&mut self) {
        if !self.mines_placed {
            warn!("Adjacency requested before mine placement, ignoring");
            return;
        }
        if self.armed {
            debug!("Adjacency already computed");
            return;
        }

        for index in 0..self.field.cells.len() {
            if self.field.cells[index].mine {
                continue;
            }
            let pos = self.field.pos(index);
            let count = self
                .field
                .neighbors(pos)
                .filter(|&neighbor| self.field.get(neighbor).is_some_and(Cell::is_mine))
                .count();
            self.field.cells[index].adjacent = count as u8;
        }

        self.hidden_safe = self.field.cells.len() - self.mine_count;
        self.armed = true;
    }

    /// Replaces this board wholesale with a fresh one. On error the current board is kept.
    pub fn reset(&mut self, config: BoardConfig) -> Result<()> {
        self.reset_with_rng(config, &mut rand::rng())
    }

    pub fn reset_with_rng<R: Rng>(&mut self, config: BoardConfig, rng: &mut R) -> Result<()> {
        *self = Self::generate(config, rng)?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn reveal(&mut self, pos: Pos) -> RevealOutcome {
        if self.status.is_finished() {
            debug!("Ignoring reveal on finished game at ({}, {})", pos.row, pos.col);
            return self.unchanged();
        }
        let Some(index) = self.field.index(pos) else {
            warn!("Invalid reveal position: ({}, {})", pos.row, pos.col);
            return self.unchanged();
        };
        if !self.armed {
            warn!("Ignoring reveal on a board without a mine layout");
            return self.unchanged();
        }

        let cell = self.field.cells[index];
        match cell.state {
            RevealState::Revealed => {
                debug!("Ignoring reveal on revealed cell ({}, {})", pos.row, pos.col);
                return self.unchanged();
            }
            RevealState::Flagged => {
                debug!("Ignoring reveal on flagged cell ({}, {})", pos.row, pos.col);
                return self.unchanged();
            }
            RevealState::Hidden => {}
        }

        if cell.mine {
            warn!("Mine hit at ({}, {}) - game over!", pos.row, pos.col);
            self.status = GameStatus::Lost;
            self.detonated = Some(pos);
            let updates = self.surface_mines();
            info!("Game ended with loss, surfaced {} mines", updates.len());
            return RevealOutcome {
                updates,
                status: self.status,
            };
        }

        let mut updates = Vec::new();
        self.open(index, &mut updates);

        // a winning reveal never needs to cascade
        if self.hidden_safe == 0 {
            self.status = GameStatus::Won;
        } else if cell.adjacent == 0 {
            self.cascade(pos, &mut updates);
            debug!("Cascade from ({}, {}) revealed {} cells", pos.row, pos.col, updates.len());
        }

        if self.status == GameStatus::Won {
            info!("Game won! All safe cells revealed.");
        }

        RevealOutcome {
            updates,
            status: self.status,
        }
    }

    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn toggle_flag(&mut self, pos: Pos) -> ToggleOutcome {
        let unchanged = ToggleOutcome {
            cell: None,
            flag_count: self.flag_count,
        };
        if self.status.is_finished() {
            debug!("Ignoring flag on finished game at ({}, {})", pos.row, pos.col);
            return unchanged;
        }
        let Some(index) = self.field.index(pos) else {
            warn!("Invalid flag position: ({}, {})", pos.row, pos.col);
            return unchanged;
        };
        if !self.armed {
            warn!("Ignoring flag on a board without a mine layout");
            return unchanged;
        }

        let cell = &mut self.field.cells[index];
        match cell.state {
            RevealState::Hidden => {
                cell.state = RevealState::Flagged;
                self.flag_count += 1;
                debug!("Cell ({}, {}) flagged", pos.row, pos.col);
            }
            RevealState::Flagged => {
                cell.state = RevealState::Hidden;
                self.flag_count -= 1;
                debug!("Cell ({}, {}) unflagged", pos.row, pos.col);
            }
            RevealState::Revealed => {
                debug!("Ignoring flag on revealed cell ({}, {})", pos.row, pos.col);
                return unchanged;
            }
        }

        ToggleOutcome {
            cell: Some(CellView {
                pos,
                tile: self.tile(index),
            }),
            flag_count: self.flag_count,
        }
    }

    pub fn rows(&self) -> usize {
        self.field.rows
    }

    pub fn cols(&self) -> usize {
        self.field.cols
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new(self.field.rows, self.field.cols, self.mine_count)
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    /// Safe cells still hidden. Zero until the board is armed.
    pub fn hidden_safe_count(&self) -> usize {
        self.hidden_safe
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// `mine_count - flag_count`; negative when over-flagged.
    pub fn mines_remaining(&self) -> isize {
        self.mine_count as isize - self.flag_count as isize
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.field.get(pos)
    }

    pub fn view(&self, pos: Pos) -> Option<CellView> {
        let index = self.field.index(pos)?;
        Some(CellView {
            pos,
            tile: self.tile(index),
        })
    }

    /// Every tile, one `Vec` per row.
    pub fn views(&self) -> Vec<Vec<Tile>> {
        (0..self.field.cells.len())
            .map(|index| self.tile(index))
            .collect::<Vec<_>>()
            .chunks(self.field.cols)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    fn tile(&self, index: usize) -> Tile {
        let cell = &self.field.cells[index];
        if self.status == GameStatus::Lost && cell.mine {
            return if self.detonated == Some(self.field.pos(index)) {
                Tile::Detonated
            } else {
                Tile::Mine
            };
        }
        match cell.state {
            RevealState::Hidden => Tile::Hidden,
            RevealState::Flagged => Tile::Flagged,
            RevealState::Revealed => Tile::Revealed {
                adjacent: cell.adjacent,
            },
        }
    }

    fn unchanged(&self) -> RevealOutcome {
        RevealOutcome {
            updates: Vec::new(),
            status: self.status,
        }
    }

    fn open(&mut self, index: usize, updates: &mut Vec<CellView>) {
        let adjacent = {
            let cell = &mut self.field.cells[index];
            cell.state = RevealState::Revealed;
            cell.adjacent
        };
        self.hidden_safe -= 1;
        updates.push(CellView {
            pos: self.field.pos(index),
            tile: Tile::Revealed { adjacent },
        });
    }

    /// Breadth-first expansion from an already revealed zero cell. Each cell is
    /// revealed when first reached, so it is queued at most once.
    fn cascade(&mut self, start: Pos, updates: &mut Vec<CellView>) {
        let mut queue = VecDeque::from([start]);

        while let Some(pos) = queue.pop_front() {
            for neighbor in self.field.neighbors(pos) {
                let Some(index) = self.field.index(neighbor) else {
                    continue;
                };
                let cell = self.field.cells[index];
                if cell.state != RevealState::Hidden || cell.mine {
                    continue;
                }

                self.open(index, updates);
                if self.hidden_safe == 0 {
                    self.status = GameStatus::Won;
                    return;
                }
                if cell.adjacent == 0 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// Display pass after a loss: the detonated mine first, then every other mine.
    /// Reveal state is left untouched.
    fn surface_mines(&self) -> Vec<CellView> {
        let mut updates: Vec<CellView> = self
            .field
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.mine)
            .map(|(index, _)| CellView {
                pos: self.field.pos(index),
                tile: self.tile(index),
            })
            .collect();
        updates.sort_by_key(|view| view.tile != Tile::Detonated);
        updates
    }
}
