//! Top-N frequency ranking.
//!
//! Counts are descending; equal counts keep the order in which their keys were
//! first seen. The tie-break is an explicit secondary key so the result does
//! not depend on the sort routine being stable.

use std::collections::HashMap;

use crate::models::RankedEntry;

/// Number of entries returned by every ranking
pub const TOP_N: usize = 10;

#[derive(Debug)]
struct Tally {
    key: String,
    label: String,
    count: u64,
}

/// Accumulates occurrence counts per key.
#[derive(Debug, Default)]
pub struct FrequencyRanker {
    tallies: Vec<Tally>,
    positions: HashMap<String, usize>,
}

impl FrequencyRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`
    pub fn record(&mut self, key: &str, label: &str) {
        self.tally(key, label, 1);
    }

    /// Add `weight` occurrences of `key`. The label of the first occurrence wins.
    pub fn tally(&mut self, key: &str, label: &str, weight: u64) {
        if weight == 0 {
            return;
        }

        match self.positions.get(key) {
            Some(&pos) => self.tallies[pos].count += weight,
            None => {
                self.positions.insert(key.to_string(), self.tallies.len());
                self.tallies.push(Tally {
                    key: key.to_string(),
                    label: label.to_string(),
                    count: weight,
                });
            }
        }
    }

    /// Number of distinct keys seen so far
    pub fn distinct(&self) -> usize {
        self.tallies.len()
    }

    /// Highest `n` counts, ties in first-seen order
    pub fn top(self, n: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<(usize, Tally)> = self.tallies.into_iter().enumerate().collect();
        ranked.sort_unstable_by(|(a_seen, a), (b_seen, b)| {
            b.count.cmp(&a.count).then(a_seen.cmp(b_seen))
        });

        ranked
            .into_iter()
            .take(n)
            .map(|(_, t)| RankedEntry {
                key: t.key,
                label: t.label,
                count: t.count,
            })
            .collect()
    }
}

/// Rank `(key, label)` occurrences and keep the top ten.
pub fn rank_by_frequency<I, K, L>(items: I) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (K, L)>,
    K: AsRef<str>,
    L: AsRef<str>,
{
    let mut ranker = FrequencyRanker::new();
    for (key, label) in items {
        ranker.record(key.as_ref(), label.as_ref());
    }
    ranker.top(TOP_N)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(entries: &[RankedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn counts_and_orders_by_frequency() {
        let ranked = rank_by_frequency(["😀", "😀", "😂"].iter().map(|e| (*e, *e)));
        assert_eq!(
            ranked,
            vec![
                RankedEntry {
                    key: "😀".into(),
                    label: "😀".into(),
                    count: 2
                },
                RankedEntry {
                    key: "😂".into(),
                    label: "😂".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn truncates_to_first_ten_distinct_keys() {
        let items: Vec<String> = (0..15).map(|i| format!("k{i}")).collect();
        let ranked = rank_by_frequency(items.iter().map(|k| (k, k)));

        assert_eq!(ranked.len(), TOP_N);
        let expected: Vec<String> = (0..10).map(|i| format!("k{i}")).collect();
        assert_eq!(keys(&ranked), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let ranked = rank_by_frequency(
            ["b", "a", "c", "a", "b", "c", "d"].iter().map(|k| (*k, *k)),
        );
        assert_eq!(keys(&ranked), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn weighted_tallies_merge_with_records() {
        let mut ranker = FrequencyRanker::new();
        ranker.tally("user_1", "alice", 2);
        ranker.tally("user_2", "bob", 5);
        ranker.record("user_1", "ignored label");
        ranker.tally("user_3", "carol", 0);

        assert_eq!(ranker.distinct(), 2);
        let ranked = ranker.top(TOP_N);
        assert_eq!(keys(&ranked), vec!["user_2", "user_1"]);
        assert_eq!(ranked[1].count, 3);
        assert_eq!(ranked[1].label, "alice");
    }

    #[test]
    fn empty_input_yields_empty_ranking() {
        let ranked = rank_by_frequency(Vec::<(String, String)>::new());
        assert!(ranked.is_empty());
    }
}
