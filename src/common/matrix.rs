use super::bits::BitBuffer;
use super::error::{QRError, QRResult};
use super::grid::ByteGrid;
use super::iter::DataRegionIter;
use super::mask::MaskPattern;
use super::metadata::{ECLevel, Version};

// Matrix builder
//------------------------------------------------------------------------------

/// Stencils a complete symbol into `grid`: function patterns, format and
/// version info, then the codeword stream under `mask`. The grid is cleared
/// first, so one scratch grid can be reused across mask trials.
pub fn build_matrix(
    data: &BitBuffer,
    ec_level: ECLevel,
    version: Version,
    mask: MaskPattern,
    grid: &mut ByteGrid,
) -> QRResult<()> {
    debug_assert!(
        grid.width() == version.width() && grid.height() == version.width(),
        "Grid doesn't match version dimension"
    );

    grid.clear(ByteGrid::UNSET);
    embed_basic_patterns(version, grid);
    embed_format_info(ec_level, mask, grid);
    embed_version_info(version, grid);
    embed_data_bits(data, version, mask, grid)
}

// Negative coordinates address from the far edge, which keeps the info
// coordinate tables version independent.
fn put(grid: &mut ByteGrid, x: i32, y: i32, value: u8) {
    let x = if x < 0 { x + grid.width() } else { x };
    let y = if y < 0 { y + grid.height() } else { y };
    grid.set(x, y, value);
}

// Function patterns
//------------------------------------------------------------------------------

fn embed_basic_patterns(version: Version, grid: &mut ByteGrid) {
    draw_finder_patterns(grid);
    // Dark module above the bottom-left format area
    put(grid, 8, -8, 1);
    draw_alignment_patterns(version, grid);
    draw_timing_patterns(grid);
}

fn draw_finder_patterns(grid: &mut ByteGrid) {
    draw_finder_pattern_at(3, 3, grid);
    draw_finder_pattern_at(-4, 3, grid);
    draw_finder_pattern_at(3, -4, grid);
}

// Draws the 7x7 finder centered at (x, y) along with its separator ring;
// the asymmetric ranges clip the separator rows that fall off the grid.
fn draw_finder_pattern_at(x: i32, y: i32, grid: &mut ByteGrid) {
    let (dx_left, dx_right) = if x > 0 { (-3, 4) } else { (-4, 3) };
    let (dy_top, dy_bottom) = if y > 0 { (-3, 4) } else { (-4, 3) };
    for j in dy_top..=dy_bottom {
        for i in dx_left..=dx_right {
            let value = match (i, j) {
                (4 | -4, _) | (_, 4 | -4) => 0,
                (3 | -3, _) | (_, 3 | -3) => 1,
                (2 | -2, _) | (_, 2 | -2) => 0,
                _ => 1,
            };
            put(grid, x + i, y + j, value);
        }
    }
}

fn draw_alignment_patterns(version: Version, grid: &mut ByteGrid) {
    let centers = version.alignment_pattern_centers();
    for &cy in centers {
        for &cx in centers {
            // Occupied centers mark the three finder corners
            if grid.is_unset(cx, cy) {
                draw_alignment_pattern_at(cx, cy, grid);
            }
        }
    }
}

fn draw_alignment_pattern_at(x: i32, y: i32, grid: &mut ByteGrid) {
    for j in -2..=2 {
        for i in -2..=2 {
            let value = match (i, j) {
                (-2 | 2, _) | (_, -2 | 2) | (0, 0) => 1,
                _ => 0,
            };
            grid.set(x + i, y + j, value);
        }
    }
}

fn draw_timing_patterns(grid: &mut ByteGrid) {
    let w = grid.width();
    for i in 8..w - 8 {
        let value = ((i + 1) % 2) as u8;
        if grid.is_unset(i, 6) {
            grid.set(i, 6, value);
        }
        if grid.is_unset(6, i) {
            grid.set(6, i, value);
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

fn embed_format_info(ec_level: ECLevel, mask: MaskPattern, grid: &mut ByteGrid) {
    let bits = format_info_bits(ec_level, mask);
    draw_number(bits, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_MAIN, grid);
    draw_number(bits, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_SIDE, grid);
}

fn embed_version_info(version: Version, grid: &mut ByteGrid) {
    if version.number() < 7 {
        return;
    }
    let bits = version_info_bits(version);
    let w = grid.width();
    for i in 0..6 {
        for j in 0..3 {
            let value = ((bits >> (i * 3 + j)) & 1) as u8;
            // Bottom-left block, and its transpose top-right
            grid.set(i, w - 11 + j, value);
            grid.set(w - 11 + j, i, value);
        }
    }
}

// Draws `bit_len` bits of `number`, most significant first, over `coords`
fn draw_number(number: u32, bit_len: usize, coords: &[(i32, i32)], grid: &mut ByteGrid) {
    let mut mask = 1 << (bit_len - 1);
    for &(x, y) in coords {
        put(grid, x, y, u8::from(number & mask != 0));
        mask >>= 1;
    }
}

/// 15 format bits: EC level and mask pattern, BCH(15,5) protected and
/// XOR-masked so no level/mask combination yields all zeros.
pub(crate) fn format_info_bits(ec_level: ECLevel, mask: MaskPattern) -> u32 {
    let format_data = (ec_level.format_bits() << 3) | *mask as u32;
    ((format_data << 10) | bch_code(format_data, FORMAT_INFO_POLY)) ^ FORMAT_INFO_MASK
}

/// 18 version bits, BCH(18,6) protected; only defined for versions 7..=40
pub(crate) fn version_info_bits(version: Version) -> u32 {
    debug_assert!(version.number() >= 7, "No version info below version 7");
    let number = version.number() as u32;
    (number << 12) | bch_code(number, VERSION_INFO_POLY)
}

// Remainder of `value` shifted up by deg(poly), divided by `poly` over GF(2)
fn bch_code(value: u32, poly: u32) -> u32 {
    let msb = 32 - poly.leading_zeros();
    let mut value = value << (msb - 1);
    while 32 - value.leading_zeros() >= msb {
        value ^= poly << (32 - value.leading_zeros() - msb);
    }
    value
}

// Data placement
//------------------------------------------------------------------------------

// Walks the zig-zag placement order, dropping each data bit XOR the mask
// predicate into the next free module. Modules left after the stream runs
// out are the remainder bits, light before masking.
fn embed_data_bits(
    data: &BitBuffer,
    version: Version,
    mask: MaskPattern,
    grid: &mut ByteGrid,
) -> QRResult<()> {
    let mask_fn = mask.mask_function();
    let mut bit_index = 0;
    for (x, y) in DataRegionIter::new(version) {
        if !grid.is_unset(x, y) {
            continue;
        }
        let bit = if bit_index < data.len() {
            bit_index += 1;
            data.get(bit_index - 1)
        } else {
            false
        };
        grid.set(x, y, u8::from(bit != mask_fn(x, y)));
    }
    if bit_index != data.len() {
        return Err(QRError::InternalConsistency("data bits left over after filling the symbol"));
    }
    Ok(())
}


// Global constants
//------------------------------------------------------------------------------

pub(crate) static FORMAT_INFO_BIT_LEN: usize = 15;

pub(crate) static VERSION_INFO_BIT_LEN: usize = 18;

static FORMAT_INFO_POLY: u32 = 0x537;

static VERSION_INFO_POLY: u32 = 0x1F25;

static FORMAT_INFO_MASK: u32 = 0x5412;

/// (x, y) slots of the top-left format info copy, most significant bit first
static FORMAT_INFO_COORDS_MAIN: [(i32, i32); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

/// (x, y) slots of the split second copy along the opposite edges, most
/// significant bit first
static FORMAT_INFO_COORDS_SIDE: [(i32, i32); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (-8, 8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];
