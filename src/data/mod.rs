use crate::model::Pos;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: RevealState,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    /// Only meaningful for non-mine cells.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent
    }

    pub fn state(&self) -> RevealState {
        self.state
    }
}

/// Row-major cell storage.
#[derive(Clone, Debug)]
pub struct Field {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
}

impl Field {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols).then(|| pos.col + pos.row * self.cols)
    }

    pub fn pos(&self, index: usize) -> Pos {
        Pos::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        neighbors(pos, self.rows, self.cols)
    }
}

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moore neighbourhood of `pos`, clipped to the grid. Edges do not wrap.
pub fn neighbors(pos: Pos, rows: usize, cols: usize) -> impl Iterator<Item = Pos> {
    OFFSETS.into_iter().filter_map(move |(d_row, d_col)| {
        let row = pos.row.checked_add_signed(d_row)?;
        let col = pos.col.checked_add_signed(d_col)?;
        (row < rows && col < cols).then_some(Pos { row, col })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pos: Pos, rows: usize, cols: usize) -> Vec<Pos> {
        neighbors(pos, rows, cols).collect()
    }

    #[test]
    fn center_has_eight_neighbors() {
        let found = collect(Pos::new(4, 4), 9, 9);
        assert_eq!(found.len(), 8);
        for row in 3..=5 {
            for col in 3..=5 {
                if (row, col) != (4, 4) {
                    assert!(found.contains(&Pos::new(row, col)), "missing ({row}, {col})");
                }
            }
        }
    }

    #[test]
    fn corners_and_edges_are_clipped() {
        assert_eq!(collect(Pos::new(0, 0), 9, 9).len(), 3);
        assert_eq!(collect(Pos::new(8, 8), 9, 9).len(), 3);
        assert_eq!(collect(Pos::new(0, 4), 9, 9).len(), 5);
        assert_eq!(collect(Pos::new(4, 0), 9, 9).len(), 5);
        assert!(collect(Pos::new(0, 0), 1, 1).is_empty());
    }

    #[test]
    fn index_is_row_major() {
        let field = Field::new(3, 4);
        assert_eq!(field.index(Pos::new(0, 3)), Some(3));
        assert_eq!(field.index(Pos::new(2, 1)), Some(9));
        assert_eq!(field.index(Pos::new(3, 0)), None);
        assert_eq!(field.index(Pos::new(0, 4)), None);
        assert_eq!(field.pos(9), Pos::new(2, 1));
    }
}
