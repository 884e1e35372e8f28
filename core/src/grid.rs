//! Grid model and sparse wall state
//!
//! Coordinates: `x` is the column (0 = left), `y` is the row (0 = top,
//! growing downward). Each cell stores only its own top and right walls:
//!
//! - the wall between `(x, y)` and `(x + 1, y)` is `(x, y).has_right_wall`
//! - the wall between `(x, y)` and `(x, y + 1)` is `(x, y + 1).has_top_wall`
//!
//! Every wall read or write goes through [`Grid::wall_between`] /
//! [`Grid::set_wall_between`] so callers never consult the wrong cell.

use core::fmt;

use alloc::vec::Vec;

use crate::error::MazeError;

// Direction codes used in move lists (must match Direction::code)
pub const NORTH: u8 = 0;
pub const EAST: u8 = 1;
pub const SOUTH: u8 = 2;
pub const WEST: u8 = 3;

/// Column/row position of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four grid directions, in neighbor order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Move code (0=NORTH, 1=EAST, 2=SOUTH, 3=WEST)
    pub fn code(self) -> u8 {
        match self {
            Direction::North => NORTH,
            Direction::East => EAST,
            Direction::South => SOUTH,
            Direction::West => WEST,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            NORTH => Some(Direction::North),
            EAST => Some(Direction::East),
            SOUTH => Some(Direction::South),
            WEST => Some(Direction::West),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Direction leading from `a` to the adjacent cell `b`, if they share an edge
    pub fn between(a: Coord, b: Coord) -> Option<Self> {
        if a.y == b.y {
            if b.x == a.x + 1 {
                return Some(Direction::East);
            }
            if a.x == b.x + 1 {
                return Some(Direction::West);
            }
        } else if a.x == b.x {
            if b.y == a.y + 1 {
                return Some(Direction::South);
            }
            if a.y == b.y + 1 {
                return Some(Direction::North);
            }
        }
        None
    }

    /// Step from `from` in this direction, clipped to a `width x height` grid
    pub fn step(self, from: Coord, width: usize, height: usize) -> Option<Coord> {
        // wrapping_sub turns underflow into a huge value that fails the bounds check
        let (x, y) = match self {
            Direction::North => (from.x, from.y.wrapping_sub(1)),
            Direction::East => (from.x + 1, from.y),
            Direction::South => (from.x, from.y + 1),
            Direction::West => (from.x.wrapping_sub(1), from.y),
        };
        (x < width && y < height).then_some(Coord { x, y })
    }
}

/// Which of its two walls a cell owns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Top,
    Right,
}

/// A single maze cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub(crate) coord: Coord,
    pub(crate) has_top_wall: bool,
    pub(crate) has_right_wall: bool,
    pub(crate) visited: bool,
    pub(crate) is_start: bool,
    pub(crate) is_end: bool,
    /// Tentatively part of the solver's current path
    pub(crate) on_path: bool,
    /// Grid-adjacent cell indices, fixed at construction
    pub(crate) neighbors: Vec<usize>,
    /// Neighbor indices reachable through a missing wall
    pub(crate) open_neighbors: Vec<usize>,
}

impl Cell {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            has_top_wall: true,
            has_right_wall: true,
            visited: false,
            is_start: false,
            is_end: false,
            on_path: false,
            neighbors: Vec::new(),
            open_neighbors: Vec::new(),
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn x(&self) -> usize {
        self.coord.x
    }

    pub fn y(&self) -> usize {
        self.coord.y
    }

    pub fn has_top_wall(&self) -> bool {
        self.has_top_wall
    }

    pub fn has_right_wall(&self) -> bool {
        self.has_right_wall
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    pub fn is_on_path(&self) -> bool {
        self.on_path
    }
}

/// Fixed `width x height` collection of cells plus their wall state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Whether `open_neighbors` reflects the current walls
    pub(crate) adjacency_fresh: bool,
}

impl Grid {
    /// Build a fully walled grid and precompute every cell's neighbors
    pub fn build(width: usize, height: usize) -> Result<Self, MazeError> {
        let total = width.checked_mul(height).unwrap_or(0);
        if total == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        // unallocatable sizes are invalid dimensions too
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(total)
            .map_err(|_| MazeError::InvalidDimensions { width, height })?;
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Coord { x, y }));
            }
        }

        for cell in cells.iter_mut() {
            for dir in Direction::ALL {
                if let Some(n) = dir.step(cell.coord, width, height) {
                    cell.neighbors.push(n.y * width + n.x);
                }
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            adjacency_fresh: false,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    pub(crate) fn index_of(&self, coord: Coord) -> Result<usize, MazeError> {
        if !self.contains(coord) {
            return Err(MazeError::OutOfRange {
                coord,
                width: self.width,
                height: self.height,
            });
        }
        Ok(coord.y * self.width + coord.x)
    }

    pub(crate) fn coord_of(&self, index: usize) -> Coord {
        self.cells[index].coord
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    pub(crate) fn cell_by_index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Result<&Cell, MazeError> {
        self.cell(Coord { x, y })
    }

    pub fn cell(&self, coord: Coord) -> Result<&Cell, MazeError> {
        let index = self.index_of(coord)?;
        Ok(&self.cells[index])
    }

    /// Cells in row-major order (top row first)
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Grid-adjacent cells of `coord`
    pub fn neighbors(&self, coord: Coord) -> Result<impl Iterator<Item = Coord> + '_, MazeError> {
        let cell = self.cell(coord)?;
        Ok(cell.neighbors.iter().map(move |&i| self.cells[i].coord))
    }

    /// Cells reachable from `coord` without crossing a wall.
    ///
    /// Empty until [`crate::derive_open_adjacency`] has run.
    pub fn open_neighbors(&self, coord: Coord) -> Result<impl Iterator<Item = Coord> + '_, MazeError> {
        let cell = self.cell(coord)?;
        Ok(cell.open_neighbors.iter().map(move |&i| self.cells[i].coord))
    }

    /// Owner cell index and side of the wall separating `a` and `b`
    fn wall_slot(&self, a: Coord, b: Coord) -> Result<(usize, Side), MazeError> {
        self.index_of(a)?;
        self.index_of(b)?;
        let dir = Direction::between(a, b).ok_or(MazeError::NotAdjacent { a, b })?;
        let (owner, side) = match dir {
            Direction::East => (a, Side::Right),
            Direction::West => (b, Side::Right),
            Direction::South => (b, Side::Top),
            Direction::North => (a, Side::Top),
        };
        Ok((self.index_of(owner)?, side))
    }

    /// Whether a wall separates the adjacent cells `a` and `b`
    pub fn wall_between(&self, a: Coord, b: Coord) -> Result<bool, MazeError> {
        let (owner, side) = self.wall_slot(a, b)?;
        let cell = &self.cells[owner];
        Ok(match side {
            Side::Top => cell.has_top_wall,
            Side::Right => cell.has_right_wall,
        })
    }

    /// Place or remove the wall between `a` and `b`.
    ///
    /// Invalidates any previously derived open adjacency.
    pub fn set_wall_between(&mut self, a: Coord, b: Coord, present: bool) -> Result<(), MazeError> {
        let (owner, side) = self.wall_slot(a, b)?;
        let cell = &mut self.cells[owner];
        match side {
            Side::Top => cell.has_top_wall = present,
            Side::Right => cell.has_right_wall = present,
        }
        self.adjacency_fresh = false;
        Ok(())
    }

    pub(crate) fn has_wall(&self, a: usize, b: usize) -> bool {
        // indices always come from a neighbor list, so the pair is adjacent
        self.wall_between(self.coord_of(a), self.coord_of(b))
            .unwrap_or(true)
    }

    pub(crate) fn remove_wall(&mut self, a: usize, b: usize) -> Result<(), MazeError> {
        self.set_wall_between(self.coord_of(a), self.coord_of(b), false)
    }

    /// Number of interior walls that have been removed.
    ///
    /// Border walls (top row tops, right column rights) are never counted.
    pub fn missing_walls(&self) -> usize {
        self.cells
            .iter()
            .map(|c| {
                let top = c.coord.y > 0 && !c.has_top_wall;
                let right = c.coord.x + 1 < self.width && !c.has_right_wall;
                top as usize + right as usize
            })
            .sum()
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    pub fn reset_visited(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.visited = false;
        }
    }

    pub fn clear_path_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.on_path = false;
        }
    }

    /// Flag `start` and `end`, clearing any earlier markers
    pub fn mark_endpoints(&mut self, start: Coord, end: Coord) -> Result<(), MazeError> {
        let s = self.index_of(start)?;
        let e = self.index_of(end)?;
        if s == e {
            return Err(MazeError::EndpointsCoincide(start));
        }
        for cell in self.cells.iter_mut() {
            cell.is_start = false;
            cell.is_end = false;
        }
        self.cells[s].is_start = true;
        self.cells[e].is_end = true;
        Ok(())
    }

    pub fn start(&self) -> Option<Coord> {
        self.cells.iter().find(|c| c.is_start).map(|c| c.coord)
    }

    pub fn end(&self) -> Option<Coord> {
        self.cells.iter().find(|c| c.is_end).map(|c| c.coord)
    }

    /// Whether the open adjacency matches the current walls
    pub fn has_fresh_adjacency(&self) -> bool {
        self.adjacency_fresh
    }
}
