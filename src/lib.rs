//! # qrforge
//!
//! A Rust library for generating QR codes with Reed-Solomon error correction,
//! automatic version selection and penalty-scored mask selection.
//!
//! ## Features
//!
//! - **QR Code Generation**: Numeric, alphanumeric and byte payloads across versions 1-40
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H) over GF(256)
//! - **Automatic Sizing**: Smallest fitting version chosen unless one is pinned
//! - **Mask Selection**: All eight patterns scored by the standard penalty rules
//! - **Character Sets**: ISO-8859-1 by default, UTF-8 and Shift_JIS with ECI headers
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new("Hello, World!").build()?;
//! assert_eq!(qr.width(), 21);
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .version(Version::new(2))   // QR version (size) - if not provided, finds smallest fit
//!     .ec_level(ECLevel::Q)       // Error correction level - defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))  // Mask pattern - if not provided, finds best by penalty
//!     .build()?;
//!
//! for y in 0..qr.width() {
//!     for x in 0..qr.width() {
//!         let _dark = qr.module(x, y);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::items_after_test_module, dead_code)]

pub mod builder;
pub(crate) mod common;
pub mod encoder;

pub use builder::QRBuilder;
pub use common::bits::BitBuffer;
pub use common::charset::CharacterSet;
pub use common::ec::{GaloisField, GfPoly, ReedSolomonEncoder, QR_CODE_FIELD};
pub use common::error::{QRError, QRResult};
pub use common::grid::ByteGrid;
pub use common::mask::MaskPattern;
pub use common::metadata::{ECBlocks, ECLevel, Mode, Version};
pub use encoder::{encode, EncodeHints, QRSymbol};
