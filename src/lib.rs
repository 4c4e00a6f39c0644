//! # qrcraft
//!
//! A Rust library for building ISO/IEC 18004 QR code symbols, with every stage of the
//! pipeline exposed: bit stream encoding, GF(256) Reed-Solomon error correction, block
//! interleaving, module placement and masking.
//!
//! ## Features
//!
//! - **Symbol Generation**: Versions 1 to 40, error correction levels L, M, Q and H, numeric,
//!   alphanumeric and byte modes with optional UTF-8 ECI
//! - **Reed-Solomon Codec**: Systematic encoder plus a Euclidean-algorithm decoder that
//!   corrects up to half as many byte errors as there are ecc codewords
//! - **Stage Access**: Padding bytes, blocks and interleaved codewords are returned alongside
//!   the symbol, so callers can edit bytes and rebuild only what changed
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrcraft::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only content, all other settings are automatically chosen
//! let qr = QRBuilder::new("Hello, World!").build()?;
//!
//! let matrix = qr.to_matrix()?; // Rows of modules, dark as true
//! assert_eq!(matrix.len(), qr.width());
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrcraft::{ECLevel, MaskPattern, Mode, QRBuilder, Utf8Policy, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("HELLO WORLD")
//!     .mode(Mode::Alphanumeric)      // Encoding mode - if not provided, detected from content
//!     .version(Version::new(1)?)     // QR version (size) - if not provided, finds smallest version to fit content
//!     .ec_level(ECLevel::M)          // Error correction level - if not provided, defaults to ECLevel::M
//!     .utf8(Utf8Policy::Auto)        // UTF-8 ECI policy for byte mode - defaults to Utf8Policy::Auto
//!     .mask(MaskPattern::new(3)?)    // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! println!("{}", qr.metadata());
//! # Ok(())
//! # }
//! ```
//!
//! ### Editing Padding and Rebuilding
//!
//! ```rust
//! use qrcraft::{build_matrix, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let enc = QRBuilder::new("PAD").encode()?;
//! let pad_len = enc.encoded.padding_range().len();
//! let edited = enc.encoded.replace_padding(&vec![0xAB; pad_len])?;
//!
//! // Recomputes ecc, interleaving and placement only
//! let qr = build_matrix(&edited.data, edited.version, edited.ec_level, enc.qr.mask())?;
//! assert_eq!(qr.mask(), enc.qr.mask());
//! # Ok(())
//! # }
//! ```
//!
//! ### Reed-Solomon Error Correction
//!
//! ```rust
//! use qrcraft::{ReedSolomonDecoder, ReedSolomonEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = b"reed-solomon";
//! let mut codeword = data.to_vec();
//! codeword.extend(ReedSolomonEncoder::encode(data, 8)?);
//!
//! codeword[2] ^= 0x55;
//! codeword[9] ^= 0x0F;
//! let corrected = ReedSolomonDecoder::default().decode(&mut codeword, 8)?;
//! assert_eq!(corrected, 2);
//! assert_eq!(&codeword[..data.len()], data);
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Masks
//! - Eight patterns flip data modules to break up runs and finder-like shapes. Without an
//!   explicit mask the builder scores all eight with the standard penalty rules and keeps
//!   the lowest.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{build_matrix, Encoding, Module, QRBuilder, QR};
pub use common::codec::{
    encode, encode_with_version, find_min_version, EncodedData, Mode, SegmentLengths, Utf8Policy,
};
pub use common::ec::{
    calculate_ecc_for_blocks, error_correction_capacity, interleave_blocks, interleaved_index,
    split_into_blocks, Block, GFPoly, GaloisField, ReedSolomonDecoder, ReedSolomonEncoder,
    QR_FIELD,
};
pub use common::error::{ErrorKind, QRError, QRResult};
pub use common::mask::{apply_best_mask, compute_total_penalty, MaskPattern};
pub use common::metadata::{format_info, Color, ECLevel, Metadata, Version};
pub use common::version_db::BlockStructure;
pub(crate) use common::*;
