//! Offline 2D rectangle bin packing.
//!
//! Three interchangeable engines place a batch of rectangles into any
//! number of fixed-size bins, optionally flipping them 90°:
//! - Guillotine (choice + split heuristics, optional free-rect merge)
//! - MaxRects (BSSF / BLSF / BAF / BottomLeft / ContactPoint)
//! - Skyline (BottomLeft / MinWaste, optional waste-map recovery)
//!
//! Rectangles are registered with `add` and placed in one `pack` call;
//! results are read back from the engine's records. An unplaceable
//! rectangle carries the [`UNPLACED`] bin index.
//!
//! Quick example:
//! ```
//! use rect_binpack::{BinConfig, MaxRectsConfig, Packer, PackerConfig};
//!
//! # fn main() -> rect_binpack::Result<()> {
//! let cfg = PackerConfig::MaxRects(MaxRectsConfig::new(BinConfig::new(256, 256)));
//! let mut packer = Packer::new(cfg)?;
//! let tile = packer.add("tile", 64, 32)?;
//! let summary = packer.pack();
//! assert!(summary.success);
//! assert!(packer.item(tile).is_placed());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod packer;

pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude for common types.
pub mod prelude {
    pub use crate::config::{
        BinConfig, GuillotineChoice, GuillotineConfig, GuillotineSplit, MaxRectsConfig,
        MaxRectsHeuristic, PackerConfig, SkylineConfig, SkylineHeuristic,
    };
    pub use crate::error::{PackError, Result};
    pub use crate::model::{Handle, Item, PackSummary, Rect, UNPLACED};
    pub use crate::packer::{GuillotinePacker, MaxRectsPacker, Packer, SkylinePacker};
}
