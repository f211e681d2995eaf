use glam::{UVec2, Vec2};
use sph2d_core::grid::CellGrid;

/// 100 x 100 domain, 10 x 10 cells of size 10.
fn grid() -> CellGrid {
    CellGrid::new(100.0, 100.0, 10)
}

#[test]
fn test_grid_insert_and_query() {
    let mut grid = grid();

    // Two particles in neighboring cells, one far away
    let positions = [
        Vec2::new(1.0, 1.0),
        Vec2::new(12.0, 8.0),
        Vec2::new(45.0, 45.0),
    ];
    for (i, &pos) in positions.iter().enumerate() {
        grid.insert(i as u32, pos);
    }

    let neighbors: Vec<u32> = grid.neighbors(positions[0]).collect();

    assert!(neighbors.contains(&0), "should find self");
    assert!(neighbors.contains(&1), "should find particle in adjacent cell");
    assert!(!neighbors.contains(&2), "should NOT find far particle");
}

#[test]
fn test_cell_index_formula() {
    let grid = grid();
    assert_eq!(grid.cell_coords(Vec2::new(-50.0, -50.0)), UVec2::new(0, 0));
    assert_eq!(grid.cell_coords(Vec2::new(-40.0, -50.0)), UVec2::new(1, 0));
    assert_eq!(grid.cell_coords(Vec2::new(-40.01, -30.5)), UVec2::new(0, 1));
    assert_eq!(grid.cell_coords(Vec2::ZERO), UVec2::new(5, 5));
    assert_eq!(grid.cell_index(Vec2::new(0.0, 0.0)), 55);
    assert_eq!(grid.cell_size(), 10.0);
}

#[test]
fn test_out_of_range_positions_are_clamped() {
    let grid = grid();
    assert_eq!(grid.cell_coords(Vec2::new(50.0, 50.0)), UVec2::new(9, 9));
    assert_eq!(grid.cell_coords(Vec2::new(1.0e6, -1.0e6)), UVec2::new(9, 0));
    assert_eq!(
        grid.cell_coords(Vec2::new(f32::INFINITY, f32::NEG_INFINITY)),
        UVec2::new(9, 0)
    );
    assert_eq!(grid.cell_coords(Vec2::new(f32::NAN, 0.0)), UVec2::new(0, 5));
    assert!(grid.cell_index(Vec2::splat(1.0e9)) < grid.cell_count());
}

#[test]
fn test_grid_all_particles_found() {
    let mut grid = grid();

    let mut positions = Vec::new();
    for i in 0..1000 {
        let t = i as f32 / 1000.0;
        let angle = t * std::f32::consts::TAU * 20.0;
        let r = 2.0 + t * 45.0;
        positions.push(Vec2::new(angle.cos() * r, angle.sin() * r));
    }
    for (i, &pos) in positions.iter().enumerate() {
        grid.insert(i as u32, pos);
    }

    for (i, &pos) in positions.iter().enumerate() {
        let mut found_self = false;
        grid.query_neighbors(pos, |idx| {
            if idx == i as u32 {
                found_self = true;
            }
        });
        assert!(found_self, "particle {} not found in its own cell query", i);
    }
}

#[test]
fn test_grid_empty() {
    let grid = grid();
    let mut count = 0;
    grid.query_neighbors(Vec2::ZERO, |_| count += 1);
    assert_eq!(count, 0);
    assert_eq!(grid.active_cells().count(), 0);
}

#[test]
fn test_query_at_corner_skips_missing_cells() {
    let mut grid = grid();
    grid.insert(0, Vec2::new(-49.0, -49.0)); // cell (0, 0)
    grid.insert(1, Vec2::new(-35.0, -35.0)); // cell (1, 1)
    grid.insert(2, Vec2::new(-25.0, -25.0)); // cell (2, 2)

    let mut neighbors: Vec<u32> = grid.neighbors(Vec2::new(-49.0, -49.0)).collect();
    neighbors.sort_unstable();
    assert_eq!(neighbors, vec![0, 1]);
}

#[test]
fn test_query_does_not_wrap_around() {
    let mut grid = grid();
    grid.insert(0, Vec2::new(49.0, 0.0)); // column 9
    grid.insert(1, Vec2::new(0.0, 49.0)); // row 9

    let found: Vec<u32> = grid.neighbors(Vec2::new(-49.0, 0.0)).collect();
    assert!(found.is_empty(), "column 0 must not see column 9: {found:?}");
    let found: Vec<u32> = grid.neighbors(Vec2::new(0.0, -49.0)).collect();
    assert!(found.is_empty(), "row 0 must not see row 9: {found:?}");
}

#[test]
fn test_query_far_outside_uses_border_cells() {
    let mut grid = grid();
    grid.insert(7, Vec2::new(48.0, 48.0));

    let found: Vec<u32> = grid.neighbors(Vec2::new(500.0, 500.0)).collect();
    assert_eq!(found, vec![7]);
}

#[test]
fn test_transfer_across_many_cells() {
    let mut grid = grid();
    let from = grid.insert(3, Vec2::new(-45.0, -45.0));
    let to = grid.cell_index(Vec2::new(45.0, 45.0));
    assert_eq!(from, 0);
    assert_eq!(to, 99);

    grid.transfer(3, from, to);
    assert!(grid.cell(from).is_empty());
    assert_eq!(grid.cell(to), &[3]);
}

#[test]
fn test_remove_keeps_order_of_others() {
    let mut grid = grid();
    for slot in 0..4 {
        grid.insert(slot, Vec2::new(1.0, 1.0));
    }
    let cell = grid.cell_index(Vec2::new(1.0, 1.0));

    assert!(grid.remove(1, cell));
    assert!(!grid.remove(1, cell), "second remove should find nothing");
    assert_eq!(grid.cell(cell), &[0, 2, 3]);
}

#[test]
fn test_active_cells_row_major() {
    let mut grid = grid();
    grid.insert(0, Vec2::new(25.0, -45.0)); // (7, 0)
    grid.insert(1, Vec2::new(-45.0, 5.0)); // (0, 5)
    grid.insert(2, Vec2::new(-44.0, 6.0)); // (0, 5) again

    let cells: Vec<UVec2> = grid.active_cells().collect();
    assert_eq!(cells, vec![UVec2::new(7, 0), UVec2::new(0, 5)]);

    grid.clear();
    assert_eq!(grid.active_cells().count(), 0);
}

#[test]
fn test_non_square_domain_rows() {
    let exact = CellGrid::new(100.0, 50.0, 10);
    assert_eq!(exact.columns(), 10);
    assert_eq!(exact.rows(), 5);
    assert_eq!(exact.cell_count(), 50);

    let partial = CellGrid::new(100.0, 55.0, 10);
    assert_eq!(partial.rows(), 6);
    assert_eq!(
        partial.cell_coords(Vec2::new(0.0, 27.0)),
        UVec2::new(5, 5),
        "partial last row must still be addressable"
    );
}
