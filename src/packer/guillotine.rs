use tracing::{debug, instrument};

use super::Staging;
use crate::config::{GuillotineChoice, GuillotineConfig, GuillotineSplit};
use crate::error::Result;
use crate::model::{Handle, Item, PackSummary, Rect};

/// One bin's free-rectangle list. Disjoint by construction.
#[derive(Debug)]
struct Bin {
    full: bool,
    free: Vec<Rect>,
}

impl Bin {
    fn open(width: u32, height: u32) -> Self {
        Self {
            full: false,
            free: vec![Rect::new(0, 0, width, height)],
        }
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

/// Offline guillotine packing over any number of bins.
///
/// Each placement claims the top-left corner of a free rectangle and
/// splits the leftover with a single straight cut; the split axis is
/// chosen by [`GuillotineSplit`].
#[derive(Debug)]
pub struct GuillotinePacker<K = String> {
    cfg: GuillotineConfig,
    staging: Staging<K>,
    bins: Vec<Bin>,
}

impl<K> GuillotinePacker<K> {
    pub fn new(cfg: GuillotineConfig) -> Result<Self> {
        cfg.bin.validate()?;
        Ok(Self {
            cfg,
            staging: Staging::new(),
            bins: Vec::new(),
        })
    }

    pub fn configure(&mut self, cfg: GuillotineConfig) -> Result<()> {
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
        let (w, h) = (self.cfg.bin.width, self.cfg.bin.height);
        self.bins = (0..self.cfg.bin.start_bins()).map(|_| Bin::open(w, h)).collect();

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
                self.bins.push(Bin::open(w, h));
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

    /// Global minimum-score scan: bins in allocation order, free
    /// rectangles in structural order, items in registration order,
    /// upright before flipped. An exact-dimension fit ends the scan
    /// outright.
    fn find_best(&self) -> Option<Found> {
        let can_flip = self.cfg.bin.can_flip;
        let mut best: Option<Found> = None;
        let mut best_score = u32::MAX;

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
                        let score = score(self.cfg.choice, fr, item.w, item.h);
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
                        let score = score(self.cfg.choice, fr, item.h, item.w);
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

    fn commit(&mut self, found: Found) {
        let idx = self.staging.take(found.pending);
        let fr = self.bins[found.bin].free[found.free];

        let item = &mut self.staging.items[idx];
        item.x = fr.x;
        item.y = fr.y;
        item.flipped = found.flip;
        item.bin = found.bin as u32;
        let (w, h) = item.extent();

        let bin = &mut self.bins[found.bin];
        if w == fr.w && h == fr.h {
            bin.free.remove(found.free);
            return;
        }
        if w == fr.w {
            let f = &mut bin.free[found.free];
            f.y += h;
            f.h -= h;
        } else if h == fr.h {
            let f = &mut bin.free[found.free];
            f.x += w;
            f.w -= w;
        } else {
            let (bottom, right) = split(self.cfg.split, &fr, w, h);
            bin.free[found.free] = bottom;
            bin.free.push(right);
        }
        if self.cfg.merge {
            merge(&mut bin.free);
        }
    }
}

fn score(choice: GuillotineChoice, fr: &Rect, w: u32, h: u32) -> u32 {
    let short = (fr.w - w).min(fr.h - h);
    let long = (fr.w - w).max(fr.h - h);
    let area = fr.area() - w * h;
    match choice {
        GuillotineChoice::BestAreaFit => area,
        GuillotineChoice::BestShortSideFit => short,
        GuillotineChoice::BestLongSideFit => long,
        GuillotineChoice::WorstAreaFit => u32::MAX - area,
        GuillotineChoice::WorstShortSideFit => u32::MAX - short,
        GuillotineChoice::WorstLongSideFit => u32::MAX - long,
    }
}

/// Splits the leftover of `fr` around a `w` x `h` placement in its
/// top-left corner. A horizontal cut gives the bottom piece the full
/// free width; a vertical cut gives the right piece the full free
/// height.
pub(crate) fn split(heuristic: GuillotineSplit, fr: &Rect, w: u32, h: u32) -> (Rect, Rect) {
    let wdiff = fr.w - w;
    let hdiff = fr.h - h;

    let horizontal = match heuristic {
        GuillotineSplit::ShorterLeftoverAxis => wdiff <= hdiff,
        GuillotineSplit::LongerLeftoverAxis => wdiff > hdiff,
        GuillotineSplit::MinimizeArea => w * hdiff > wdiff * h,
        GuillotineSplit::MaximizeArea => w * hdiff <= wdiff * h,
        GuillotineSplit::ShorterAxis => fr.w <= fr.h,
        GuillotineSplit::LongerAxis => fr.w > fr.h,
    };

    let bottom = Rect::new(fr.x, fr.y + h, if horizontal { fr.w } else { w }, fr.h - h);
    let right = Rect::new(fr.x + w, fr.y, fr.w - w, if horizontal { h } else { fr.h });
    (bottom, right)
}

/// Coalesces free rectangles that are side by side and share a full
/// edge, repeating until no pair merges.
fn merge(free: &mut Vec<Rect>) {
    let mut merged = true;
    while merged {
        merged = false;
        'scan: for i in 0..free.len() {
            for j in i + 1..free.len() {
                let a = free[i];
                let b = free[j];
                if a.x == b.x && a.w == b.w {
                    if a.bottom() == b.y {
                        free[i] = Rect::new(a.x, a.y, a.w, a.h + b.h);
                        free.remove(j);
                        merged = true;
                        break 'scan;
                    } else if b.bottom() == a.y {
                        free[i] = Rect::new(a.x, b.y, a.w, a.h + b.h);
                        free.remove(j);
                        merged = true;
                        break 'scan;
                    }
                } else if a.y == b.y && a.h == b.h {
                    if a.right() == b.x {
                        free[i] = Rect::new(a.x, a.y, a.w + b.w, a.h);
                        free.remove(j);
                        merged = true;
                        break 'scan;
                    } else if b.right() == a.x {
                        free[i] = Rect::new(b.x, a.y, a.w + b.w, a.h);
                        free.remove(j);
                        merged = true;
                        break 'scan;
                    }
                }
            }
        }
    }
}
