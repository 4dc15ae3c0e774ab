//! Waffle chart tiling: splits a `width × height` grid between categories in
//! proportion to their values.
//!
//! Quotas are `value / total × cells` rounded half-to-even, raised to one tile
//! for any category with a positive value so small shares stay visible. Cells
//! are filled column by column, top to bottom, giving contiguous bands. The
//! last category takes whatever is left; quotas that overshoot the grid are cut
//! short in category order.

use tracing::trace;

use crate::error::{Result, SizerError};
use crate::models::sizing::{WaffleCategory, WaffleGrid};

fn quota(value: f64, total: f64, cells: usize) -> usize {
    let share = (value / total * cells as f64).round_ties_even() as usize;
    if value > 0.0 { share.max(1) } else { share }
}

pub fn tile<S: AsRef<str>>(categories: &[(S, f64)], width: usize, height: usize) -> Result<WaffleGrid> {
    if width == 0 || height == 0 {
        return Err(SizerError::invalid(format!("grid must be at least 1x1, got {width}x{height}")));
    }
    let cells = width
        .checked_mul(height)
        .ok_or_else(|| SizerError::invalid("grid is too large"))?;

    for (label, value) in categories {
        if !value.is_finite() || *value < 0.0 {
            return Err(SizerError::invalid(format!(
                "category '{}' has unusable value {value}",
                label.as_ref()
            )));
        }
    }
    let total: f64 = categories.iter().map(|(_, v)| v).sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(SizerError::invalid("category values must sum to a positive number"));
    }

    let last = categories.len() - 1;
    let mut remaining = cells;
    let placed: Vec<usize> = categories
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let n = if i == last { remaining } else { quota(*value, total, cells).min(remaining) };
            remaining -= n;
            n
        })
        .collect();

    let mut grid = vec![vec![0usize; width]; height];
    let mut category = 0;
    let mut used = 0;
    for col in 0..width {
        for row in 0..height {
            while used >= placed[category] && category < last {
                category += 1;
                used = 0;
            }
            grid[row][col] = category;
            used += 1;
        }
    }
    trace!(?placed, width, height, "waffle tiled");

    Ok(WaffleGrid {
        width,
        height,
        cells: grid,
        categories: categories
            .iter()
            .zip(&placed)
            .map(|((label, value), &tile_count)| WaffleCategory {
                label: label.as_ref().to_string(),
                value: *value,
                tile_count,
            })
            .collect(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts_in_cells(grid: &WaffleGrid) -> Vec<usize> {
        let mut counts = vec![0; grid.categories.len()];
        for row in &grid.cells {
            for &c in row {
                counts[c] += 1;
            }
        }
        counts
    }

    #[test]
    fn test_solar_area_versus_space() {
        let grid = tile(&[("Solar area", 2.0), ("Space", 1598.0)], 10, 10).unwrap();
        assert_eq!(grid.tile_counts(), vec![1, 99]);
        assert_eq!(grid.cells[0][0], 0);
        assert_eq!(grid.cells[1][0], 1);
        assert_eq!(grid.cells[9][9], 1);
        assert_eq!(grid.total, 1600.0);
        assert_eq!(grid.categories[0].label, "Solar area");
        assert_eq!(grid.categories[1].value, 1598.0);
    }

    #[test]
    fn test_fills_column_major() {
        // width 5, height 2: first column, then the top of the second
        let grid = tile(&[("a", 3.0), ("b", 7.0)], 5, 2).unwrap();
        assert_eq!(grid.tile_counts(), vec![3, 7]);
        assert_eq!(grid.cells[0], vec![0, 0, 1, 1, 1]);
        assert_eq!(grid.cells[1], vec![0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 2.5 and 7.5 tiles
        let grid = tile(&[("a", 5.0), ("b", 15.0)], 10, 1).unwrap();
        assert_eq!(grid.tile_counts(), vec![2, 8]);
    }

    #[test]
    fn test_last_category_absorbs_rounding_gap() {
        let grid = tile(&[("a", 1.0), ("b", 1.0), ("c", 1.0)], 10, 10).unwrap();
        assert_eq!(grid.tile_counts(), vec![33, 33, 34]);
    }

    #[test]
    fn test_overshoot_is_truncated() {
        let grid = tile(&[("a", 1.0), ("b", 1.0), ("c", 1.0)], 2, 1).unwrap();
        assert_eq!(grid.tile_counts(), vec![1, 1, 0]);
        assert_eq!(grid.cells, vec![vec![0, 1]]);
    }

    #[test]
    fn test_zero_valued_category_gets_no_tiles() {
        let grid = tile(&[("Solar area", 1600.0), ("Space", 0.0)], 10, 10).unwrap();
        assert_eq!(grid.tile_counts(), vec![100, 0]);
        let grid = tile(&[("a", 0.0), ("b", 5.0)], 4, 4).unwrap();
        assert_eq!(grid.tile_counts(), vec![0, 16]);
    }

    #[test]
    fn test_invalid_inputs() {
        let empty: [(&str, f64); 0] = [];
        assert!(tile(&empty, 10, 10).is_err());
        assert!(tile(&[("a", 0.0), ("b", 0.0)], 10, 10).is_err());
        assert!(tile(&[("a", -1.0), ("b", 5.0)], 10, 10).is_err());
        assert!(tile(&[("a", f64::NAN)], 10, 10).is_err());
        assert!(tile(&[("a", f64::INFINITY)], 10, 10).is_err());
        assert!(matches!(tile(&[("a", 1.0)], 0, 10), Err(SizerError::InvalidInput(_))));
    }

    fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0f64..1000.0, 1..6)
            .prop_filter("positive total", |v| v.iter().sum::<f64>() > 0.0)
    }

    proptest! {
        #[test]
        fn prop_grid_is_always_full(
            values in values_strategy(),
            width in 1usize..20,
            height in 1usize..20,
        ) {
            let cats: Vec<(String, f64)> =
                values.iter().enumerate().map(|(i, v)| (format!("c{i}"), *v)).collect();
            let grid = tile(&cats, width, height).unwrap();

            prop_assert_eq!(grid.cells.len(), height);
            prop_assert!(grid.cells.iter().all(|row| row.len() == width));
            prop_assert_eq!(grid.tile_counts().iter().sum::<usize>(), width * height);
            prop_assert_eq!(counts_in_cells(&grid), grid.tile_counts());
        }

        #[test]
        fn prop_raising_a_value_never_loses_tiles(
            values in values_strategy(),
            pick in any::<prop::sample::Index>(),
            bump in 0.0f64..1000.0,
            width in 1usize..20,
            height in 1usize..20,
        ) {
            let i = pick.index(values.len());
            let before: Vec<(&str, f64)> = values.iter().map(|v| ("x", *v)).collect();
            let mut after = before.clone();
            after[i].1 += bump;

            let a = tile(&before, width, height).unwrap();
            let b = tile(&after, width, height).unwrap();
            prop_assert!(b.categories[i].tile_count >= a.categories[i].tile_count);
        }

        #[test]
        fn prop_tile_is_idempotent(values in values_strategy(), width in 1usize..20, height in 1usize..20) {
            let cats: Vec<(&str, f64)> = values.iter().map(|v| ("x", *v)).collect();
            prop_assert_eq!(tile(&cats, width, height).unwrap(), tile(&cats, width, height).unwrap());
        }
    }
}
