use crate::config::{BinConfig, PackerConfig};
use crate::error::{PackError, Result};
use crate::model::{Handle, Item, PackSummary};

pub mod guillotine;
pub mod maxrects;
pub mod skyline;

pub use guillotine::GuillotinePacker;
pub use maxrects::MaxRectsPacker;
pub use skyline::SkylinePacker;

/// Packs a 32-bit primary criterion and its tiebreak into one score
/// so the minimum-wins scan stays uniform across heuristics.
#[inline]
pub(crate) fn combine(primary: u32, secondary: u32) -> u64 {
    (primary as u64) << 32 | secondary as u64
}

/// Flip-aware feasibility test against the bin extents.
#[inline]
pub(crate) fn fits(w: u32, h: u32, bin_w: u32, bin_h: u32, can_flip: bool) -> bool {
    (w <= bin_w && h <= bin_h) || (can_flip && h <= bin_w && w <= bin_h)
}

/// Staged records plus the indices still awaiting placement.
///
/// Registration order is the tie-break order of the placement scans,
/// so `pending` is only drained with order-preserving removals.
#[derive(Debug)]
pub(crate) struct Staging<K> {
    pub items: Vec<Item<K>>,
    pub pending: Vec<usize>,
}

impl<K> Staging<K> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Validates `(w, h)` against the flip policy and records the
    /// item. Empty rectangles are recorded but never enter the
    /// pending set; they keep the unplaced sentinel forever.
    pub fn stage(&mut self, key: K, w: u32, h: u32, bin: &BinConfig) -> Result<Handle> {
        if !fits(w, h, bin.width, bin.height, bin.can_flip) {
            return Err(PackError::RectangleTooLarge {
                width: w,
                height: h,
                bin_width: bin.width,
                bin_height: bin.height,
            });
        }
        let idx = self.items.len();
        self.items.push(Item::new(key, w, h));
        if w > 0 && h > 0 {
            self.pending.push(idx);
        }
        Ok(Handle(idx))
    }

    /// Removes and returns the pending entry at position `pos`,
    /// keeping the remaining entries in registration order.
    pub fn take(&mut self, pos: usize) -> usize {
        self.pending.remove(pos)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending.clear();
    }
}

/// Tagged-variant engine exposing the uniform packing surface.
///
/// The variant is selected by the [`PackerConfig`] passed to `new`;
/// [`Packer::configure`] may switch it. The concrete engines are also
/// public for callers that want a fixed algorithm.
#[derive(Debug)]
pub enum Packer<K = String> {
    Guillotine(GuillotinePacker<K>),
    MaxRects(MaxRectsPacker<K>),
    Skyline(SkylinePacker<K>),
}

impl<K> Packer<K> {
    /// Stores the configuration. No bins are allocated until `pack`.
    pub fn new(cfg: PackerConfig) -> Result<Self> {
        Ok(match cfg {
            PackerConfig::Guillotine(c) => Self::Guillotine(GuillotinePacker::new(c)?),
            PackerConfig::MaxRects(c) => Self::MaxRects(MaxRectsPacker::new(c)?),
            PackerConfig::Skyline(c) => Self::Skyline(SkylinePacker::new(c)?),
        })
    }

    /// Replaces the configuration and resets all state, possibly
    /// switching the active engine.
    pub fn configure(&mut self, cfg: PackerConfig) -> Result<()> {
        *self = Self::new(cfg)?;
        Ok(())
    }

    /// Stages an input rectangle under `key`.
    ///
    /// Fails with [`PackError::RectangleTooLarge`] when the rectangle
    /// cannot fit a bin in any allowed orientation; the engine state
    /// is unchanged in that case.
    pub fn add(&mut self, key: K, w: u32, h: u32) -> Result<Handle> {
        match self {
            Self::Guillotine(p) => p.add(key, w, h),
            Self::MaxRects(p) => p.add(key, w, h),
            Self::Skyline(p) => p.add(key, w, h),
        }
    }

    /// Places every staged rectangle. See the engine docs for the
    /// driver loop; call [`Packer::clear`] before reusing the engine
    /// on a new batch.
    pub fn pack(&mut self) -> PackSummary {
        match self {
            Self::Guillotine(p) => p.pack(),
            Self::MaxRects(p) => p.pack(),
            Self::Skyline(p) => p.pack(),
        }
    }

    /// Discards bins and staged items; the configuration is kept.
    pub fn clear(&mut self) {
        match self {
            Self::Guillotine(p) => p.clear(),
            Self::MaxRects(p) => p.clear(),
            Self::Skyline(p) => p.clear(),
        }
    }

    pub fn num_bins(&self) -> u32 {
        match self {
            Self::Guillotine(p) => p.num_bins(),
            Self::MaxRects(p) => p.num_bins(),
            Self::Skyline(p) => p.num_bins(),
        }
    }

    /// All records in registration order.
    pub fn items(&self) -> &[Item<K>] {
        match self {
            Self::Guillotine(p) => p.items(),
            Self::MaxRects(p) => p.items(),
            Self::Skyline(p) => p.items(),
        }
    }

    pub fn item(&self, handle: Handle) -> &Item<K> {
        match self {
            Self::Guillotine(p) => p.item(handle),
            Self::MaxRects(p) => p.item(handle),
            Self::Skyline(p) => p.item(handle),
        }
    }
}
