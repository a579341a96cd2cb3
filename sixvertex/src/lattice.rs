//! The fixed-size 2D grid of cells that the flip kernel operates on.

use crate::error::{Error, Result};
use crate::vertex::VertexType;
use std::io::Read;

/// A single lattice site: a vertex type plus its derived running height.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    /// The vertex label occupying this site.
    pub ty: VertexType,
    /// The running row-prefix height at this site (see [`Lattice::rebuild_heights`]).
    pub height: i64,
}

/// A rectangular `rows x cols` grid of [`Cell`]s, row-major, row `0` at the top.
#[derive(Clone, Debug)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Lattice {
    /// Builds a lattice from the first `rows * cols` bytes of `bytes`, which must be ASCII
    /// digits `'0'..='5'`. Trailing bytes beyond `rows * cols` are ignored. Heights are derived
    /// immediately via [`Self::rebuild_heights`].
    pub fn from_bytes(bytes: &[u8], rows: usize, cols: usize) -> Result<Self> {
        let needed = rows * cols;
        if bytes.len() < needed {
            return Err(Error::ShortInput {
                rows,
                cols,
                needed,
                got: bytes.len(),
            });
        }

        let mut cells = Vec::with_capacity(needed);
        for &byte in &bytes[..needed] {
            cells.push(Cell {
                ty: VertexType::from_digit(byte)?,
                height: 0,
            });
        }

        let mut lattice = Self { rows, cols, cells };
        lattice.rebuild_heights();
        Ok(lattice)
    }

    /// Reads the whole of `reader` and parses it as in [`Self::from_bytes`].
    pub fn from_reader(mut reader: impl Read, rows: usize, cols: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, rows, cols)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    const fn index(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= rows()` or `c >= cols()`.
    #[must_use]
    pub fn cell(&self, r: usize, c: usize) -> Cell {
        self.cells[self.index(r, c)]
    }

    /// Returns the vertex type at `(r, c)`.
    #[must_use]
    pub fn vertex_type(&self, r: usize, c: usize) -> VertexType {
        self.cell(r, c).ty
    }

    /// Returns the running height at `(r, c)`.
    #[must_use]
    pub fn height(&self, r: usize, c: usize) -> i64 {
        self.cell(r, c).height
    }

    /// Overwrites the vertex type at `(r, c)`, leaving its stored height untouched.
    ///
    /// Used only by the flip kernel, which is responsible for separately adjusting the height
    /// that the relabelling invalidates.
    pub(crate) fn set_vertex_type(&mut self, r: usize, c: usize, ty: VertexType) {
        let idx = self.index(r, c);
        self.cells[idx].ty = ty;
    }

    /// Adds `delta` to the stored height at `(r, c)`.
    pub(crate) fn adjust_height(&mut self, r: usize, c: usize, delta: i64) {
        let idx = self.index(r, c);
        self.cells[idx].height += delta;
    }

    /// Recomputes every cell's height from scratch: a left-to-right running count per row,
    /// incremented whenever a cell's type is in `{a1, b1, c2}`.
    ///
    /// This is the authoritative height derivation, used once at load time and available as an
    /// invariant-check oracle; the flip kernel does not call it after every move (see
    /// `Lattice::height` docs and the crate's design notes on anchor-only height maintenance).
    pub fn rebuild_heights(&mut self) {
        for r in 0..self.rows {
            let mut running: i64 = 0;
            for c in 0..self.cols {
                let idx = self.index(r, c);
                if self.cells[idx].ty.contributes_height() {
                    running += 1;
                }
                self.cells[idx].height = running;
            }
        }
    }

    /// The lattice volume: the sum of every cell's stored height.
    #[must_use]
    pub fn volume(&self) -> i64 {
        self.cells.iter().map(|cell| cell.height).sum()
    }

    /// Renders the lattice back to the row-major digit string the parser reads, enabling the
    /// parse round-trip law.
    #[must_use]
    pub fn to_digit_string(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.ty.to_digit() as char)
            .collect()
    }
}
