//! Open-adjacency derivation: which neighbors can be reached without crossing a wall

use alloc::vec::Vec;

use crate::grid::Grid;

/// Recompute `open_neighbors` for every cell from the current walls.
///
/// Neighbors keep their construction order, so repeated calls on the same
/// walls give identical lists.
pub fn derive_open_adjacency(grid: &mut Grid) {
    let mut open_pairs = 0;
    for index in 0..grid.len() {
        let open: Vec<usize> = grid
            .cell_by_index(index)
            .neighbors
            .iter()
            .copied()
            .filter(|&n| !grid.has_wall(index, n))
            .collect();
        open_pairs += open.len();
        grid.cell_mut(index).open_neighbors = open;
    }
    grid.adjacency_fresh = true;

    tracing::debug!("Derived open adjacency: {} passages", open_pairs / 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::maze_gen::Carver;
    use crate::rng::SimpleLcg;

    fn open(grid: &Grid, x: usize, y: usize) -> Vec<Coord> {
        grid.open_neighbors(Coord::new(x, y)).unwrap().collect()
    }

    #[test]
    fn test_fully_walled_has_no_open_neighbors() {
        let mut grid = Grid::build(3, 2).unwrap();
        derive_open_adjacency(&mut grid);
        assert!(grid.has_fresh_adjacency());
        assert!(grid.cells().all(|c| grid.open_neighbors(c.coord()).unwrap().count() == 0));
    }

    #[test]
    fn test_left_openness_reads_left_neighbor_right_wall() {
        let mut grid = Grid::build(3, 3).unwrap();
        // clear every flag on (1,1) itself: its left side must stay closed
        grid.set_wall_between(Coord::new(1, 1), Coord::new(2, 1), false)
            .unwrap();
        grid.set_wall_between(Coord::new(1, 1), Coord::new(1, 0), false)
            .unwrap();
        derive_open_adjacency(&mut grid);

        assert_eq!(open(&grid, 1, 1), [Coord::new(1, 0), Coord::new(2, 1)]);
        assert!(open(&grid, 0, 1).is_empty());

        // now drop (0,1)'s right wall
        grid.set_wall_between(Coord::new(0, 1), Coord::new(1, 1), false)
            .unwrap();
        assert!(!grid.has_fresh_adjacency());
        derive_open_adjacency(&mut grid);

        assert!(!grid.cell_at(0, 1).unwrap().has_right_wall());
        assert_eq!(
            open(&grid, 1, 1),
            [Coord::new(1, 0), Coord::new(2, 1), Coord::new(0, 1)]
        );
        assert_eq!(open(&grid, 0, 1), [Coord::new(1, 1)]);
    }

    #[test]
    fn test_bottom_openness_reads_lower_top_wall() {
        let mut grid = Grid::build(2, 2).unwrap();
        grid.set_wall_between(Coord::new(1, 1), Coord::new(1, 0), false)
            .unwrap();
        derive_open_adjacency(&mut grid);

        assert!(!grid.cell_at(1, 1).unwrap().has_top_wall());
        assert_eq!(open(&grid, 1, 0), [Coord::new(1, 1)]);
        assert_eq!(open(&grid, 1, 1), [Coord::new(1, 0)]);
    }

    #[test]
    fn test_symmetric_after_generation() {
        let mut grid = Grid::build(9, 7).unwrap();
        Carver::new(&mut grid, Coord::new(4, 3), SimpleLcg::new(31337))
            .unwrap()
            .run()
            .unwrap();
        derive_open_adjacency(&mut grid);

        let mut passages = 0;
        for cell in grid.cells() {
            for n in grid.open_neighbors(cell.coord()).unwrap() {
                assert!(open(&grid, n.x, n.y).contains(&cell.coord()));
                assert!(!grid.wall_between(cell.coord(), n).unwrap());
                passages += 1;
            }
        }
        assert_eq!(passages / 2, grid.len() - 1);
    }

    #[test]
    fn test_idempotent() {
        let mut grid = Grid::build(6, 6).unwrap();
        Carver::new(&mut grid, Coord::new(0, 0), SimpleLcg::new(8))
            .unwrap()
            .run()
            .unwrap();

        derive_open_adjacency(&mut grid);
        let once = grid.clone();
        derive_open_adjacency(&mut grid);
        assert_eq!(grid, once);
    }
}
