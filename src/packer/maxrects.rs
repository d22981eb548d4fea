use tracing::{debug, instrument};

use super::{combine, Staging};
use crate::config::{MaxRectsConfig, MaxRectsHeuristic};
use crate::error::Result;
use crate::model::{Handle, Item, PackSummary, Rect};

/// One bin's maximal-free-rectangle set. Entries may overlap
/// pairwise, but none is contained in another.
#[derive(Debug)]
struct Bin {
    full: bool,
    free: Vec<Rect>,
    /// Placed rectangles, kept only under [`MaxRectsHeuristic::ContactPoint`].
    used: Option<Vec<Rect>>,
}

impl Bin {
    fn open(width: u32, height: u32, track_used: bool) -> Self {
        Self {
            full: false,
            free: vec![Rect::new(0, 0, width, height)],
            used: track_used.then(Vec::new),
        }
    }

    /// Subtracts `node` from every intersecting free rectangle,
    /// replacing it with up to four maximal leftover pieces, then
    /// prunes contained entries.
    fn place(&mut self, node: &Rect) {
        let mut kept: Vec<Rect> = Vec::with_capacity(self.free.len());
        let mut fresh: Vec<Rect> = Vec::new();

        for fr in self.free.drain(..) {
            if !fr.intersects(node) {
                kept.push(fr);
                continue;
            }
            // top and bottom span the full free width, left and right
            // its full height, keeping every piece maximal
            if node.y > fr.y && node.y < fr.bottom() {
                fresh.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
            }
            if node.bottom() < fr.bottom() {
                fresh.push(Rect::new(fr.x, node.bottom(), fr.w, fr.bottom() - node.bottom()));
            }
            if node.x > fr.x && node.x < fr.right() {
                fresh.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
            }
            if node.right() < fr.right() {
                fresh.push(Rect::new(node.right(), fr.y, fr.right() - node.right(), fr.h));
            }
        }

        // Drop pieces strictly inside a distinct sibling; equality is
        // not containment here, so duplicate pieces both survive to
        // the next rule.
        let snapshot = fresh.clone();
        fresh.retain(|r| !snapshot.iter().any(|o| o != r && o.contains(r)));
        // Pieces swallowed by an untouched free rectangle, and
        // untouched free rectangles swallowed by a piece.
        fresh.retain(|r| !kept.iter().any(|o| o.contains(r)));
        kept.retain(|r| !fresh.iter().any(|o| o.contains(r)));

        kept.extend(fresh);
        self.free = kept;
    }
}

#[derive(Debug)]
struct Found {
    bin: usize,
    free: usize,
    /// Position in the pending list, not the item index.
    pending: usize,
    flip: bool,
}

/// Offline MaxRects packing over any number of bins.
#[derive(Debug)]
pub struct MaxRectsPacker<K = String> {
    cfg: MaxRectsConfig,
    staging: Staging<K>,
    bins: Vec<Bin>,
}

impl<K> MaxRectsPacker<K> {
    pub fn new(cfg: MaxRectsConfig) -> Result<Self> {
        cfg.bin.validate()?;
        Ok(Self {
            cfg,
            staging: Staging::new(),
            bins: Vec::new(),
        })
    }

    pub fn configure(&mut self, cfg: MaxRectsConfig) -> Result<()> {
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

    fn open_bin(&self) -> Bin {
        Bin::open(
            self.cfg.bin.width,
            self.cfg.bin.height,
            self.cfg.heuristic == MaxRectsHeuristic::ContactPoint,
        )
    }

    #[instrument(skip_all)]
    pub fn pack(&mut self) -> PackSummary {
        self.bins = (0..self.cfg.bin.start_bins()).map(|_| self.open_bin()).collect();

        while !self.staging.pending.is_empty() {
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
                self.bins.push(self.open_bin());
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

    fn find_best(&self) -> Option<Found> {
        let can_flip = self.cfg.bin.can_flip;
        let mut best: Option<Found> = None;
        let mut best_score = u64::MAX;

        for (b, bin) in self.bins.iter().enumerate() {
            if bin.full {
                continue;
            }
            for (f, fr) in bin.free.iter().enumerate() {
                for (p, &idx) in self.staging.pending.iter().enumerate() {
                    let item = &self.staging.items[idx];

                    if item.w == fr.w && item.h == fr.h {
                        return Some(Found {
                            bin: b,
                            free: f,
                            pending: p,
                            flip: false,
                        });
                    }
                    if can_flip && item.h == fr.w && item.w == fr.h {
                        return Some(Found {
                            bin: b,
                            free: f,
                            pending: p,
                            flip: true,
                        });
                    }

                    if item.w <= fr.w && item.h <= fr.h {
                        let score = self.score(bin, fr, item.w, item.h);
                        if best.is_none() || score < best_score {
                            best_score = score;
                            best = Some(Found {
                                bin: b,
                                free: f,
                                pending: p,
                                flip: false,
                            });
                        }
                    }
                    if can_flip && item.h <= fr.w && item.w <= fr.h {
                        let score = self.score(bin, fr, item.h, item.w);
                        if best.is_none() || score < best_score {
                            best_score = score;
                            best = Some(Found {
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

    fn score(&self, bin: &Bin, fr: &Rect, w: u32, h: u32) -> u64 {
        let short = (fr.w - w).min(fr.h - h);
        let long = (fr.w - w).max(fr.h - h);
        match self.cfg.heuristic {
            MaxRectsHeuristic::BestShortSideFit => combine(short, long),
            MaxRectsHeuristic::BestLongSideFit => combine(long, short),
            MaxRectsHeuristic::BestAreaFit => combine(fr.area() - w * h, short),
            MaxRectsHeuristic::BottomLeft => combine(fr.y + h, fr.x),
            // larger contact is better under the minimum-wins scan
            MaxRectsHeuristic::ContactPoint => {
                u64::MAX - self.contact_score(bin, fr.x, fr.y, w, h) as u64
            }
        }
    }

    /// Total perimeter length the tentative placement shares with the
    /// bin edges and with already-placed rectangles.
    fn contact_score(&self, bin: &Bin, x: u32, y: u32, w: u32, h: u32) -> u32 {
        let mut score = 0u32;

        if x == 0 {
            score += h;
        }
        if x + w == self.cfg.bin.width {
            score += h;
        }
        if y == 0 {
            score += w;
        }
        if y + h == self.cfg.bin.height {
            score += w;
        }

        if let Some(used) = &bin.used {
            for u in used {
                if u.x == x + w || u.right() == x {
                    score += overlap_1d(y, y + h, u.y, u.bottom());
                }
                if u.y == y + h || u.bottom() == y {
                    score += overlap_1d(x, x + w, u.x, u.right());
                }
            }
        }
        score
    }

    fn commit(&mut self, found: Found) {
        let idx = self.staging.take(found.pending);
        let fr = self.bins[found.bin].free[found.free];

        let item = &mut self.staging.items[idx];
        item.x = fr.x;
        item.y = fr.y;
        item.flipped = found.flip;
        item.bin = found.bin as u32;
        let (w, h) = item.extent();

        let node = Rect::new(fr.x, fr.y, w, h);
        let bin = &mut self.bins[found.bin];
        bin.place(&node);
        if let Some(used) = &mut bin.used {
            used.push(node);
        }
    }
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    let start = a1.max(b1);
    let end = a2.min(b2);
    end.saturating_sub(start)
}
