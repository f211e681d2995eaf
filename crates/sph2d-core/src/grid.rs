use glam::{UVec2, Vec2};

/// Upper bound on the number of cells a grid may allocate.
pub const MAX_CELLS: usize = 1 << 22;

/// Uniform cell grid over a bounded domain centred on the origin.
///
/// Each cell keeps the arena slots of the particles whose position falls
/// inside it, in insertion order. Positions outside the domain (or NaN) are
/// clamped onto the border cells, so every position maps to a valid cell.
pub struct CellGrid {
    half_extent: Vec2,
    cell_size: f32,
    inv_cell_size: f32,
    columns: u32,
    rows: u32,
    cells: Vec<Vec<u32>>,
}

impl CellGrid {
    /// Create a grid covering `width x height` with `columns` square cells
    /// per row. The row count is whatever covers `height` at that cell size.
    ///
    /// `columns * rows` must not exceed [`MAX_CELLS`]; `FluidConfig::validate`
    /// checks this before a simulation builds its grid.
    pub fn new(width: f32, height: f32, columns: u32) -> Self {
        let columns = columns.max(1);
        let cell_size = width / columns as f32;
        let rows = Self::row_count(width, height, columns);
        Self {
            half_extent: Vec2::new(width, height) * 0.5,
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns as usize * rows as usize],
        }
    }

    /// Rows needed to cover `height` with `columns` square cells across
    /// `width`. Saturates at `u32::MAX`.
    pub fn row_count(width: f32, height: f32, columns: u32) -> u32 {
        let cell_size = width / columns.max(1) as f32;
        // Tolerance keeps an exact multiple from rounding up to an extra row.
        ((height / cell_size) - 1e-4).ceil().max(1.0) as u32
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Column/row of the cell containing `pos`, clamped into the grid.
    #[inline]
    pub fn cell_coords(&self, pos: Vec2) -> UVec2 {
        let (cx, cy) = self.raw_coords(pos);
        UVec2::new(
            cx.clamp(0, self.columns as i32 - 1) as u32,
            cy.clamp(0, self.rows as i32 - 1) as u32,
        )
    }

    /// Flat index of the cell containing `pos`.
    #[inline]
    pub fn cell_index(&self, pos: Vec2) -> usize {
        let c = self.cell_coords(pos);
        (c.y * self.columns + c.x) as usize
    }

    /// Slots stored in the cell at `index`.
    pub fn cell(&self, index: usize) -> &[u32] {
        &self.cells[index]
    }

    /// Add `slot` to the cell containing `pos` and return that cell's index.
    pub fn insert(&mut self, slot: u32, pos: Vec2) -> usize {
        let index = self.cell_index(pos);
        self.cells[index].push(slot);
        index
    }

    /// Detach `slot` from the cell at `index`. Returns false if it was not there.
    pub fn remove(&mut self, slot: u32, index: usize) -> bool {
        let cell = &mut self.cells[index];
        match cell.iter().position(|&s| s == slot) {
            Some(at) => {
                cell.remove(at);
                true
            }
            None => false,
        }
    }

    /// Move `slot` from cell `from` into cell `to`. The two cells need not be
    /// adjacent.
    pub fn transfer(&mut self, slot: u32, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.remove(slot, from);
        self.cells[to].push(slot);
    }

    /// All slots in the 3x3 block of cells around the cell containing `pos`.
    ///
    /// Cells past the grid edge are skipped; there is no wraparound. The
    /// caller is responsible for distance checks.
    pub fn neighbors(&self, pos: Vec2) -> impl Iterator<Item = u32> + '_ {
        let centre = self.cell_coords(pos).as_ivec2();
        (-1..=1_i32)
            .flat_map(move |dy| (-1..=1_i32).map(move |dx| (centre.x + dx, centre.y + dy)))
            .filter_map(move |(cx, cy)| self.flat_index(cx, cy))
            .flat_map(move |index| self.cells[index].iter().copied())
    }

    /// Calls `callback(slot)` for each slot yielded by [`CellGrid::neighbors`].
    pub fn query_neighbors<F: FnMut(u32)>(&self, pos: Vec2, mut callback: F) {
        for slot in self.neighbors(pos) {
            callback(slot);
        }
    }

    /// Coordinates of every cell holding at least one slot, row-major.
    pub fn active_cells(&self) -> impl Iterator<Item = UVec2> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, _)| UVec2::new(i as u32 % columns, i as u32 / columns))
    }

    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
    }

    /// Unclamped cell coordinates. NaN maps to 0 via the saturating cast.
    #[inline]
    fn raw_coords(&self, pos: Vec2) -> (i32, i32) {
        let rel = (pos + self.half_extent) * self.inv_cell_size;
        (rel.x.floor() as i32, rel.y.floor() as i32)
    }

    #[inline]
    fn flat_index(&self, cx: i32, cy: i32) -> Option<usize> {
        let in_range = (0..self.columns as i32).contains(&cx) && (0..self.rows as i32).contains(&cy);
        in_range.then(|| (cy as u32 * self.columns + cx as u32) as usize)
    }
}
