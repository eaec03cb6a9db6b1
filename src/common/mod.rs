pub mod bits;
pub mod charset;
pub mod ec;
pub mod error;
pub mod grid;
pub mod iter;
pub mod mask;
pub mod matrix;
pub mod metadata;

pub use bits::*;
pub use charset::*;
pub use ec::*;
pub use error::*;
pub use grid::*;
pub use mask::*;
pub use metadata::*;
