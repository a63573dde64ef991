use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, PoisonError},
};

use crate::delegate::{random::RandomCategory, session::PlayerId};

type StatsKey = (Option<PlayerId>, RandomCategory);

/// Summary of the rolls recorded for one player and category
#[derive(Clone, Debug, PartialEq)]
pub struct RandomStatistic {
    pub total: u64,
    pub average: f64,
    pub median: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    /// Rolled value -> times rolled
    pub histogram: BTreeMap<u32, u64>,
}

impl RandomStatistic {
    fn from_histogram(histogram: BTreeMap<u32, u64>) -> Self {
        let total: u64 = histogram.values().sum();
        if total == 0 {
            return Self {
                total,
                average: 0.0,
                median: 0.0,
                variance: 0.0,
                standard_deviation: 0.0,
                histogram,
            };
        }

        let sum: f64 = histogram
            .iter()
            .map(|(value, times)| f64::from(*value) * *times as f64)
            .sum();
        let average = sum / total as f64;
        let variance = histogram
            .iter()
            .map(|(value, times)| {
                let delta = f64::from(*value) - average;
                delta * delta * *times as f64
            })
            .sum::<f64>()
            / total as f64;
        let median = (nth_value(&histogram, (total - 1) / 2) + nth_value(&histogram, total / 2))
            / 2.0;

        Self {
            total,
            average,
            median,
            variance,
            standard_deviation: variance.sqrt(),
            histogram,
        }
    }
}

// value at position `index` of the sorted rolls
fn nth_value(histogram: &BTreeMap<u32, u64>, index: u64) -> f64 {
    let mut seen = 0;
    for (value, times) in histogram {
        seen += times;
        if index < seen {
            return f64::from(*value);
        }
    }
    0.0
}

// RandomStats
/// Append-only record of every random value handed to delegates, kept per
/// (player, category)
#[derive(Default)]
pub struct RandomStats {
    histograms: Mutex<HashMap<StatsKey, BTreeMap<u32, u64>>>,
}

impl RandomStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_random(&self, player: Option<&PlayerId>, category: RandomCategory, values: &[u32]) {
        let mut histograms = self
            .histograms
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let histogram = histograms
            .entry((player.cloned(), category))
            .or_default();
        for value in values {
            *histogram.entry(*value).or_insert(0) += 1;
        }
    }

    pub fn statistic(
        &self,
        player: Option<&PlayerId>,
        category: RandomCategory,
    ) -> RandomStatistic {
        let histogram = self
            .histograms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(player.cloned(), category))
            .cloned()
            .unwrap_or_default();
        RandomStatistic::from_histogram(histogram)
    }

    /// Rolls recorded across every player and category
    pub fn total_rolls(&self) -> u64 {
        self.histograms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flat_map(|histogram| histogram.values())
            .sum()
    }
}
