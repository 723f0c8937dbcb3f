#![allow(missing_docs)]

use geo::Point;
use predprey::simulation::spatial::SpatialIndex;

fn sorted(mut keys: Vec<usize>) -> Vec<usize> {
    keys.sort_unstable();
    keys
}

#[test]
fn test_neighbors_include_own_and_adjacent_cells() {
    let mut grid = SpatialIndex::new(10.0);
    grid.insert(1, &Point::new(5.0_f32, 5.0));
    grid.insert(2, &Point::new(14.0_f32, 5.0));
    grid.insert(3, &Point::new(45.0_f32, 5.0));

    // Default radius reaches two cells in every direction.
    let found = sorted(grid.neighbors_at(Point::new(5.0, 5.0), None));
    assert_eq!(found, vec![1, 2]);

    let found = sorted(grid.neighbors_at(Point::new(5.0, 5.0), Some(40.0)));
    assert_eq!(found, vec![1, 2, 3]);
}

#[test]
fn test_query_returns_own_key() {
    let mut grid = SpatialIndex::new(50.0);
    let p = Point::new(120.0_f32, 80.0);
    grid.insert(7, &p);

    assert_eq!(grid.neighbors(&p, None), vec![7]);
}

#[test]
fn test_negative_coordinates_map_to_negative_cells() {
    let grid: SpatialIndex = SpatialIndex::new(10.0);
    assert_eq!(grid.cell_of(Point::new(-0.5, -0.5)), (-1, -1));
    assert_eq!(grid.cell_of(Point::new(0.0, 19.9)), (0, 1));
}

#[test]
fn test_query_is_deterministic() {
    let mut grid = SpatialIndex::new(10.0);
    for i in 0..50 {
        let x = (i * 7 % 60) as f32;
        let y = (i * 13 % 60) as f32;
        grid.insert(i, &Point::new(x, y));
    }

    let first = grid.neighbors_at(Point::new(30.0, 30.0), Some(25.0));
    let second = grid.neighbors_at(Point::new(30.0, 30.0), Some(25.0));
    assert_eq!(first, second);
}

#[test]
fn test_relocate_matches_rebuild() {
    let before: Vec<Point<f32>> = (0..30)
        .map(|i| Point::new((i * 11 % 200) as f32, (i * 17 % 200) as f32))
        .collect();
    let after: Vec<Point<f32>> = before
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i % 3 == 0 {
                Point::new(p.x() + 37.0, p.y() - 23.0)
            } else {
                Point::new(p.x() + 1.0, p.y())
            }
        })
        .collect();

    let mut incremental = SpatialIndex::new(20.0);
    for (i, p) in before.iter().enumerate() {
        incremental.insert(i, p);
    }
    for (i, p) in after.iter().enumerate() {
        incremental.relocate(i, p);
    }

    let mut rebuilt = SpatialIndex::new(20.0);
    for (i, p) in after.iter().enumerate() {
        rebuilt.insert(i, p);
    }

    assert_eq!(incremental.len(), rebuilt.len());
    for query in [
        Point::new(0.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(180.0, 20.0),
        Point::new(-30.0, 210.0),
    ] {
        assert_eq!(
            sorted(incremental.neighbors_at(query, Some(45.0))),
            sorted(rebuilt.neighbors_at(query, Some(45.0)))
        );
    }
}

#[test]
fn test_remove_is_idempotent() {
    let mut grid = SpatialIndex::new(10.0);
    grid.insert(1, &Point::new(5.0_f32, 5.0));
    grid.remove(1);
    grid.remove(1);
    grid.remove(42);

    assert!(grid.is_empty());
    assert!(grid.neighbors_at(Point::new(5.0, 5.0), None).is_empty());
}

#[test]
#[should_panic(expected = "cell_size must be positive")]
fn test_zero_cell_size_panics() {
    let _grid: SpatialIndex = SpatialIndex::new(0.0);
}
