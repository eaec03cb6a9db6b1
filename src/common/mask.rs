use std::ops::Deref;

use super::grid::ByteGrid;

// Masking pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(x: i32, y: i32) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: i32, y: i32) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: i32, _: i32) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: i32, y: i32) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: i32, y: i32) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: i32, y: i32) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: i32, y: i32) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: i32, y: i32) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Predicate deciding which (x, y) data modules get flipped
    pub fn mask_function(self) -> fn(i32, i32) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid masking pattern"),
        }
    }
}

// Penalty scoring
//------------------------------------------------------------------------------

/// Four-rule mask evaluation over a fully stenciled grid. Lower is better.
pub fn compute_total_penalty(grid: &ByteGrid) -> u32 {
    compute_adjacent_penalty(grid)
        + compute_block_penalty(grid)
        + compute_finder_pattern_penalty(grid)
        + compute_balance_penalty(grid)
}

/// Runs of five or more same-colored modules in a row or column: 3 points
/// for the first five, one per extra module.
fn compute_adjacent_penalty(grid: &ByteGrid) -> u32 {
    compute_run_penalty(grid, true) + compute_run_penalty(grid, false)
}

fn compute_run_penalty(grid: &ByteGrid, is_horizontal: bool) -> u32 {
    let mut pen = 0;
    let w = grid.width();
    let h = grid.height();
    let (lines, cells) = if is_horizontal { (h, w) } else { (w, h) };
    for i in 0..lines {
        let mut run_len = 0;
        let mut last = ByteGrid::UNSET;
        for j in 0..cells {
            let cell = if is_horizontal { grid.get(j, i) } else { grid.get(i, j) };
            if cell == last {
                run_len += 1;
            } else {
                if run_len >= 5 {
                    pen += 3 + (run_len - 5);
                }
                run_len = 1;
                last = cell;
            }
        }
        if run_len >= 5 {
            pen += 3 + (run_len - 5);
        }
    }
    pen
}

/// 2x2 blocks of a single color: 3 points each, overlapping blocks included
fn compute_block_penalty(grid: &ByteGrid) -> u32 {
    let mut pen = 0;
    for y in 0..grid.height() - 1 {
        for x in 0..grid.width() - 1 {
            let cell = grid.get(x, y);
            if cell == grid.get(x + 1, y)
                && cell == grid.get(x, y + 1)
                && cell == grid.get(x + 1, y + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

/// Finder-lookalike 1011101 runs with four light modules on either side:
/// 40 points each, scanned both horizontally and vertically.
fn compute_finder_pattern_penalty(grid: &ByteGrid) -> u32 {
    static PATTERN: [u8; 7] = [1, 0, 1, 1, 1, 0, 1];

    let mut pen = 0;
    let w = grid.width();
    let h = grid.height();
    for y in 0..h {
        for x in 0..w - 6 {
            if (0..7).all(|k| grid.get(x + k, y) == PATTERN[k as usize])
                && (is_light_run(grid, x - 4, x, y, true)
                    || is_light_run(grid, x + 7, x + 11, y, true))
            {
                pen += 40;
            }
        }
    }
    for x in 0..w {
        for y in 0..h - 6 {
            if (0..7).all(|k| grid.get(x, y + k) == PATTERN[k as usize])
                && (is_light_run(grid, y - 4, y, x, false)
                    || is_light_run(grid, y + 7, y + 11, x, false))
            {
                pen += 40;
            }
        }
    }
    pen
}

// The probe range is clamped to the grid, so a lookalike at the edge still
// counts its truncated quiet run.
fn is_light_run(grid: &ByteGrid, from: i32, to: i32, line: i32, is_horizontal: bool) -> bool {
    let limit = if is_horizontal { grid.width() } else { grid.height() };
    let from = from.max(0);
    let to = to.min(limit);
    (from..to).all(|i| {
        let cell = if is_horizontal { grid.get(i, line) } else { grid.get(line, i) };
        cell == 0
    })
}

/// Dark/light imbalance: 10 points per 5% deviation from an even split
fn compute_balance_penalty(grid: &ByteGrid) -> u32 {
    let total = (grid.width() * grid.height()) as u32;
    let dark = grid.count_dark_modules() as u32;
    let five_percent_variances = dark.abs_diff(total - dark) * 10 / total;
    five_percent_variances * 10
}
