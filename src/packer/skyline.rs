use tracing::{debug, instrument};

use super::{combine, guillotine, Staging};
use crate::config::{GuillotineSplit, SkylineConfig, SkylineHeuristic};
use crate::error::Result;
use crate::model::{Handle, Item, PackSummary, Rect};

/// One segment of the skyline silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    x: u32,
    y: u32,
    w: u32,
}

/// Guillotine-style pool of pockets sealed below the skyline.
#[derive(Debug, Default)]
struct WasteMap {
    free: Vec<Rect>,
}

impl WasteMap {
    fn add(&mut self, r: Rect) {
        if r.w > 0 && r.h > 0 {
            self.free.push(r);
        }
    }
}

#[derive(Debug)]
struct Bin {
    full: bool,
    /// Segments ordered by `x`; together they cover `[0, width)`.
    skyline: Vec<Segment>,
    waste: WasteMap,
}

impl Bin {
    fn open(width: u32) -> Self {
        Self {
            full: false,
            skyline: vec![Segment { x: 0, y: 0, w: width }],
            waste: WasteMap::default(),
        }
    }
}

#[derive(Debug)]
struct FoundLevel {
    bin: usize,
    seg: usize,
    /// Position in the pending list, not the item index.
    pending: usize,
    y: u32,
    flip: bool,
}

#[derive(Debug)]
struct FoundWaste {
    bin: usize,
    free: usize,
    pending: usize,
    flip: bool,
}

/// Offline skyline packing over any number of bins, optionally
/// reclaiming sealed pockets through a per-bin waste map.
#[derive(Debug)]
pub struct SkylinePacker<K = String> {
    cfg: SkylineConfig,
    staging: Staging<K>,
    bins: Vec<Bin>,
}

impl<K> SkylinePacker<K> {
    pub fn new(cfg: SkylineConfig) -> Result<Self> {
        cfg.bin.validate()?;
        Ok(Self {
            cfg,
            staging: Staging::new(),
            bins: Vec::new(),
        })
    }

    pub fn configure(&mut self, cfg: SkylineConfig) -> Result<()> {
        cfg.bin.validate()?;
        self.cfg = cfg;
        self.clear();
        Ok(())
    }

    pub fn add(&mut self, key: K, w: u32, h: u32) -> Result<Handle> {
        self.staging.stage(key, w, h, &self.cfg.bin)
    }

    pub fn clear(&mut self) {
        self.staging.clear();
        self.bins.clear();
    }

    pub fn num_bins(&self) -> u32 {
        self.bins.len() as u32
    }

    pub fn items(&self) -> &[Item<K>] {
        &self.staging.items
    }

    pub fn item(&self, handle: Handle) -> &Item<K> {
        &self.staging.items[handle.index()]
    }

    #[instrument(skip_all)]
    pub fn pack(&mut self) -> PackSummary {
        let width = self.cfg.bin.width;
        self.bins = (0..self.cfg.bin.start_bins()).map(|_| Bin::open(width)).collect();

        while !self.staging.pending.is_empty() {
            // Sealed pockets are reclaimed ahead of the skyline scan.
            if self.cfg.waste_map {
                if let Some(found) = self.find_best_waste() {
                    self.commit_waste(found);
                    continue;
                }
            }

            let Some(found) = self.find_best() else {
                if self.cfg.bin.bin_cap().is_some_and(|cap| self.bins.len() >= cap) {
                    return PackSummary {
                        success: false,
                        num_bins: self.num_bins(),
                    };
                }
                for bin in &mut self.bins {
                    bin.full = true;
                }
                self.bins.push(Bin::open(width));
                debug!(bins = self.bins.len(), "opened new bin");
                continue;
            };
            self.commit(found);
        }

        PackSummary {
            success: true,
            num_bins: self.num_bins(),
        }
    }

    /// Lowest `y` at which a `w` x `h` rectangle starting at segment
    /// `i` can rest, walking segments rightward until the width is
    /// covered.
    fn rect_fits(&self, bin: &Bin, mut i: usize, w: u32, h: u32) -> Option<u32> {
        let start = &bin.skyline[i];
        if start.x + w > self.cfg.bin.width {
            return None;
        }
        let mut y = start.y;
        let mut width_left = w;
        loop {
            y = y.max(bin.skyline[i].y);
            if y + h > self.cfg.bin.height {
                return None;
            }
            if bin.skyline[i].w >= width_left {
                return Some(y);
            }
            width_left -= bin.skyline[i].w;
            i += 1;
            if i == bin.skyline.len() {
                return None;
            }
        }
    }

    /// Area of the column slivers sealed under a rectangle resting at
    /// `y` across the segments spanned from `i`.
    fn wasted_area(&self, bin: &Bin, mut i: usize, w: u32, y: u32) -> u32 {
        let mut area = 0u32;
        let mut width_left = w;
        while width_left > 0 && i < bin.skyline.len() {
            let seg = &bin.skyline[i];
            let used = width_left.min(seg.w);
            area += (y - seg.y) * used;
            width_left -= used;
            i += 1;
        }
        area
    }

    /// The primary criterion is anchored to the starting segment's
    /// own `y`; the resting `y` only governs fit and wasted area. A
    /// spanning candidate anchored to a low segment can therefore
    /// outrank a rect that would sit flush inside the gap it seals.
    fn level_score(&self, bin: &Bin, i: usize, w: u32, h: u32, y: u32) -> u64 {
        let seg = &bin.skyline[i];
        match self.cfg.heuristic {
            SkylineHeuristic::BottomLeft => combine(seg.y + h, seg.w),
            SkylineHeuristic::MinWaste => combine(self.wasted_area(bin, i, w, y), seg.y + h),
        }
    }

    fn find_best(&self) -> Option<FoundLevel> {
        let can_flip = self.cfg.bin.can_flip;
        let height = self.cfg.bin.height;
        let mut best: Option<FoundLevel> = None;
        let mut best_score = u64::MAX;

        for (b, bin) in self.bins.iter().enumerate() {
            if bin.full {
                continue;
            }
            for s in 0..bin.skyline.len() {
                let seg = bin.skyline[s];
                for (p, &idx) in self.staging.pending.iter().enumerate() {
                    let item = &self.staging.items[idx];

                    if let Some(y) = self.rect_fits(bin, s, item.w, item.h) {
                        // The free region here is the segment extended
                        // to the bin bottom; matching it exactly ends
                        // the scan.
                        if item.w == seg.w && seg.y + item.h == height {
                            return Some(FoundLevel {
                                bin: b,
                                seg: s,
                                pending: p,
                                y,
                                flip: false,
                            });
                        }
                        let score = self.level_score(bin, s, item.w, item.h, y);
                        if best.is_none() || score < best_score {
                            best_score = score;
                            best = Some(FoundLevel {
                                bin: b,
                                seg: s,
                                pending: p,
                                y,
                                flip: false,
                            });
                        }
                    }
                    if can_flip {
                        if let Some(y) = self.rect_fits(bin, s, item.h, item.w) {
                            if item.h == seg.w && seg.y + item.w == height {
                                return Some(FoundLevel {
                                    bin: b,
                                    seg: s,
                                    pending: p,
                                    y,
                                    flip: true,
                                });
                            }
                            let score = self.level_score(bin, s, item.h, item.w, y);
                            if best.is_none() || score < best_score {
                                best_score = score;
                                best = Some(FoundLevel {
                                    bin: b,
                                    seg: s,
                                    pending: p,
                                    y,
                                    flip: true,
                                });
                            }
                        }
                    }
                }
            }
        }
        best
    }

    fn commit(&mut self, found: FoundLevel) {
        let idx = self.staging.take(found.pending);
        let seg_x = self.bins[found.bin].skyline[found.seg].x;

        let item = &mut self.staging.items[idx];
        item.x = seg_x;
        item.y = found.y;
        item.flipped = found.flip;
        item.bin = found.bin as u32;
        let (w, h) = item.extent();

        let bin = &mut self.bins[found.bin];
        if self.cfg.waste_map {
            deposit_waste(bin, found.seg, seg_x, found.y, w);
        }
        raise(&mut bin.skyline, found.seg, seg_x, found.y, w, h);
    }

    /// Best-short-side scan of the per-bin waste pools.
    fn find_best_waste(&self) -> Option<FoundWaste> {
        let can_flip = self.cfg.bin.can_flip;
        let mut best: Option<FoundWaste> = None;
        let mut best_score = u32::MAX;

        for (b, bin) in self.bins.iter().enumerate() {
            if bin.full {
                continue;
            }
            for (f, fr) in bin.waste.free.iter().enumerate() {
                for (p, &idx) in self.staging.pending.iter().enumerate() {
                    let item = &self.staging.items[idx];

                    if item.w <= fr.w && item.h <= fr.h {
                        let score = (fr.w - item.w).min(fr.h - item.h);
                        if best.is_none() || score < best_score {
                            best_score = score;
                            best = Some(FoundWaste {
                                bin: b,
                                free: f,
                                pending: p,
                                flip: false,
                            });
                        }
                    }
                    if can_flip && item.h <= fr.w && item.w <= fr.h {
                        let score = (fr.w - item.h).min(fr.h - item.w);
                        if best.is_none() || score < best_score {
                            best_score = score;
                            best = Some(FoundWaste {
                                bin: b,
                                free: f,
                                pending: p,
                                flip: true,
                            });
                        }
                    }
                }
            }
        }
        best
    }

    /// Commits a waste-map hit with a guillotine split; the skyline
    /// itself is not touched.
    fn commit_waste(&mut self, found: FoundWaste) {
        let idx = self.staging.take(found.pending);
        let fr = self.bins[found.bin].waste.free[found.free];

        let item = &mut self.staging.items[idx];
        item.x = fr.x;
        item.y = fr.y;
        item.flipped = found.flip;
        item.bin = found.bin as u32;
        let (w, h) = item.extent();

        let free = &mut self.bins[found.bin].waste.free;
        if w == fr.w && h == fr.h {
            free.remove(found.free);
        } else if w == fr.w {
            let f = &mut free[found.free];
            f.y += h;
            f.h -= h;
        } else if h == fr.h {
            let f = &mut free[found.free];
            f.x += w;
            f.w -= w;
        } else {
            let (bottom, right) = guillotine::split(GuillotineSplit::MinimizeArea, &fr, w, h);
            free[found.free] = bottom;
            free.push(right);
        }
    }
}

/// Deposits the vertical gap between each spanned segment and the top
/// of a rectangle placed at `(x, y)` into the bin's waste pool.
fn deposit_waste(bin: &mut Bin, at: usize, x: u32, y: u32, w: u32) {
    let right = x + w;
    let mut i = at;
    loop {
        let seg = bin.skyline[i];
        let end = (seg.x + seg.w).min(right);
        if seg.y < y {
            bin.waste.add(Rect::new(seg.x, seg.y, end - seg.x, y - seg.y));
        }
        if seg.x + seg.w >= right || i + 1 == bin.skyline.len() {
            break;
        }
        i += 1;
    }
}

/// Replaces the span `[x, x + w)` of the silhouette with a segment at
/// `y + h`: wholly covered segments are erased, a partially covered
/// trailing segment is shortened, and adjacent equal-height segments
/// are coalesced.
fn raise(skyline: &mut Vec<Segment>, at: usize, x: u32, y: u32, w: u32, h: u32) {
    skyline.insert(at, Segment { x, y: y + h, w });

    let right = x + w;
    let mut i = at + 1;
    while i < skyline.len() && skyline[i].x < right {
        let seg = skyline[i];
        if seg.x + seg.w <= right {
            skyline.remove(i);
        } else {
            let shrink = right - seg.x;
            skyline[i].x += shrink;
            skyline[i].w -= shrink;
            break;
        }
    }

    let mut i = 1;
    while i < skyline.len() {
        if skyline[i - 1].y == skyline[i].y {
            skyline[i - 1].w += skyline[i].w;
            skyline.remove(i);
        } else {
            i += 1;
        }
    }
}
