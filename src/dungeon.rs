/// Static tile grid and the collision queries actors move against.
///
/// World coordinates map onto cells by integer division by the tile size.
/// Anything outside the grid counts as solid, so a bad query can never index
/// past the map.

use tracing::trace;

use crate::error::MapError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
}

impl Tile {
    fn from_cell(value: u8) -> Option<Tile> {
        match value {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            _ => None,
        }
    }
}

/// Reference 9 × 14 layout: a closed room with an obstruction along row 2
/// and a partition down column 8.
pub const REFERENCE_LAYOUT: [[u8; 14]; 9] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable grid of tiles, stored row-major.
#[derive(Clone, Debug)]
pub struct TileMap {
    tiles: Vec<Tile>,
    rows: usize,
    cols: usize,
    tile_size: f32,
}

impl TileMap {
    /// Build a map from rows of `0` (floor) / `1` (wall) cells.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Result<TileMap, MapError> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if cols == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows.len() * cols);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != cols {
                return Err(MapError::Ragged {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                let tile = Tile::from_cell(value).ok_or(MapError::UnknownTile { row, col, value })?;
                tiles.push(tile);
            }
        }

        Ok(TileMap {
            tiles,
            rows: rows.len(),
            cols,
            tile_size,
        })
    }

    pub fn reference(tile_size: f32) -> TileMap {
        TileMap {
            tiles: REFERENCE_LAYOUT
                .iter()
                .flatten()
                .map(|&v| if v == 1 { Tile::Wall } else { Tile::Floor })
                .collect(),
            rows: REFERENCE_LAYOUT.len(),
            cols: REFERENCE_LAYOUT[0].len(),
            tile_size,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn world_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.rows && col < self.cols {
            Some(self.tiles[row * self.cols + col])
        } else {
            None
        }
    }

    /// Grid cell `(row, col)` containing a world point, if it lies on the map.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.tile_size).floor() as usize;
        let row = (y / self.tile_size).floor() as usize;
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// True if the world point lies in a wall or off the grid.
    pub fn is_blocked(&self, x: f32, y: f32) -> bool {
        match self.cell_at(x, y).and_then(|(row, col)| self.tile(row, col)) {
            Some(tile) => tile == Tile::Wall,
            None => {
                trace!(x, y, "tile query outside the grid");
                true
            }
        }
    }

    /// Corner-sampled occupancy test for a rectangle anchored at its top-left.
    ///
    /// Only the four corners are checked, so a box wider than a tile can
    /// straddle a one-tile wall without seeing it.
    pub fn can_occupy(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let corners = [
            (x, y),
            (x + width, y),
            (x, y + height),
            (x + width, y + height),
        ];
        corners.iter().all(|&(cx, cy)| !self.is_blocked(cx, cy))
    }

    /// Iterate `(row, col, tile)` over the whole grid.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (i / self.cols, i % self.cols, tile))
    }
}
