use std::fmt::{Display, Error, Formatter};

use crate::common::grid::ByteGrid;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{ECLevel, Mode, Version};

// QR symbol
//------------------------------------------------------------------------------

/// Finished symbol: the choices the encoder made plus the module grid.
/// Immutable once built; renderers read modules through [`QRSymbol::module`]
/// and pad with [`QRSymbol::quiet_zone`] light modules on each side.
#[derive(Debug, Clone)]
pub struct QRSymbol {
    mode: Mode,
    ec_level: ECLevel,
    version: Version,
    mask: MaskPattern,
    grid: ByteGrid,
    quiet_zone: u32,
}

impl QRSymbol {
    pub(crate) fn new(
        mode: Mode,
        ec_level: ECLevel,
        version: Version,
        mask: MaskPattern,
        grid: ByteGrid,
        quiet_zone: u32,
    ) -> Self {
        Self { mode, ec_level, version, mask, grid, quiet_zone }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn mask_pattern(&self) -> MaskPattern {
        self.mask
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn quiet_zone(&self) -> u32 {
        self.quiet_zone
    }

    /// True for a dark module
    pub fn module(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y) == 1
    }

    pub fn grid(&self) -> &ByteGrid {
        &self.grid
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.count_dark_modules()
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Version: {}, Ec level: {:?}, Mode: {:?}, Mask: {} }}",
            self.version.number(),
            self.ec_level,
            self.mode,
            *self.mask
        )
    }
}

impl Display for QRSymbol {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        f.write_str(&self.metadata())
    }
}
