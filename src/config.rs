use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PackError, Result};

/// Bin geometry and allocation limits shared by all engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinConfig {
    /// Bin width.
    pub width: u32,
    /// Bin height.
    pub height: u32,
    /// Bins opened up front by `pack`; values below 1 behave as 1.
    pub min_bins: i32,
    /// Upper bound on bins; zero or negative means unlimited.
    pub max_bins: i32,
    /// Allow 90° flips for placements where beneficial.
    pub can_flip: bool,
}

impl BinConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            min_bins: 1,
            max_bins: 0,
            can_flip: true,
        }
    }

    pub fn min_bins(mut self, v: i32) -> Self {
        self.min_bins = v;
        self
    }

    pub fn max_bins(mut self, v: i32) -> Self {
        self.max_bins = v;
        self
    }

    pub fn can_flip(mut self, v: bool) -> Self {
        self.can_flip = v;
        self
    }

    /// Rejects configurations no rectangle could ever be packed into.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PackError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub(crate) fn start_bins(&self) -> usize {
        self.min_bins.max(1) as usize
    }

    pub(crate) fn bin_cap(&self) -> Option<usize> {
        (self.max_bins > 0).then_some(self.max_bins as usize)
    }
}

/// Guillotine free-rect choice heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuillotineChoice {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    WorstAreaFit,
    WorstShortSideFit,
    WorstLongSideFit,
}

impl FromStr for GuillotineChoice {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "waf" | "worstareafit" => Ok(Self::WorstAreaFit),
            "wssf" | "worstshortsidefit" => Ok(Self::WorstShortSideFit),
            "wlsf" | "worstlongsidefit" => Ok(Self::WorstLongSideFit),
            _ => Err(PackError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Guillotine split axis heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuillotineSplit {
    ShorterLeftoverAxis,
    LongerLeftoverAxis,
    MinimizeArea,
    MaximizeArea,
    ShorterAxis,
    LongerAxis,
}

impl FromStr for GuillotineSplit {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sla" | "shorterleftoveraxis" => Ok(Self::ShorterLeftoverAxis),
            "lla" | "longerleftoveraxis" => Ok(Self::LongerLeftoverAxis),
            "mina" | "minimizearea" => Ok(Self::MinimizeArea),
            "maxa" | "maximizearea" => Ok(Self::MaximizeArea),
            "sa" | "shorteraxis" => Ok(Self::ShorterAxis),
            "la" | "longeraxis" => Ok(Self::LongerAxis),
            _ => Err(PackError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaxRectsHeuristic {
    BestShortSideFit,
    BestLongSideFit,
    BestAreaFit,
    BottomLeft,
    ContactPoint,
}

impl FromStr for MaxRectsHeuristic {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            _ => Err(PackError::UnknownHeuristic(s.to_string())),
        }
    }
}

/// Skyline level heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkylineHeuristic {
    BottomLeft,
    MinWaste,
}

impl FromStr for SkylineHeuristic {
    type Err = PackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "mw" | "minwaste" => Ok(Self::MinWaste),
            _ => Err(PackError::UnknownHeuristic(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuillotineConfig {
    pub bin: BinConfig,
    pub choice: GuillotineChoice,
    pub split: GuillotineSplit,
    /// Coalesce adjacent free rectangles after each split.
    pub merge: bool,
}

impl GuillotineConfig {
    pub fn new(bin: BinConfig) -> Self {
        Self {
            bin,
            choice: GuillotineChoice::BestAreaFit,
            split: GuillotineSplit::ShorterLeftoverAxis,
            merge: false,
        }
    }

    pub fn choice(mut self, v: GuillotineChoice) -> Self {
        self.choice = v;
        self
    }

    pub fn split(mut self, v: GuillotineSplit) -> Self {
        self.split = v;
        self
    }

    pub fn merge(mut self, v: bool) -> Self {
        self.merge = v;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxRectsConfig {
    pub bin: BinConfig,
    pub heuristic: MaxRectsHeuristic,
}

impl MaxRectsConfig {
    pub fn new(bin: BinConfig) -> Self {
        Self {
            bin,
            heuristic: MaxRectsHeuristic::BestAreaFit,
        }
    }

    pub fn heuristic(mut self, v: MaxRectsHeuristic) -> Self {
        self.heuristic = v;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkylineConfig {
    pub bin: BinConfig,
    pub heuristic: SkylineHeuristic,
    /// Recover pockets sealed below the skyline through a
    /// guillotine-style free pool.
    pub waste_map: bool,
}

impl SkylineConfig {
    pub fn new(bin: BinConfig) -> Self {
        Self {
            bin,
            heuristic: SkylineHeuristic::BottomLeft,
            waste_map: false,
        }
    }

    pub fn heuristic(mut self, v: SkylineHeuristic) -> Self {
        self.heuristic = v;
        self
    }

    pub fn waste_map(mut self, v: bool) -> Self {
        self.waste_map = v;
        self
    }
}

/// Engine selection; the variant decides the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackerConfig {
    Guillotine(GuillotineConfig),
    MaxRects(MaxRectsConfig),
    Skyline(SkylineConfig),
}

impl PackerConfig {
    pub fn bin(&self) -> &BinConfig {
        match self {
            Self::Guillotine(c) => &c.bin,
            Self::MaxRects(c) => &c.bin,
            Self::Skyline(c) => &c.bin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bin().validate()
    }
}
