use std::collections::HashMap;
use std::fmt;

/// A single feature of a string: one character, or an ordered pair of
/// adjacent characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Char(char),
    Pair(char, char),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Char(c) => write!(f, "{c}"),
            Feature::Pair(a, b) => write!(f, "{a}_{b}"),
        }
    }
}

/// Character and character-bigram counts of a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    counts: HashMap<Feature, usize>,
}

impl FeatureVector {
    /// Occurrence count of `feature`, 0 when absent.
    pub fn get(&self, feature: &Feature) -> usize {
        self.counts.get(feature).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_weight(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct features.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &usize)> {
        self.counts.iter()
    }

    fn add(&mut self, feature: Feature) {
        *self.counts.entry(feature).or_insert(0) += 1;
    }
}

/// Build the feature vector of `s`.
///
/// Every character contributes weight 1, and every ordered pair of adjacent
/// characters contributes weight 1, so a string of `n >= 1` characters has a
/// total weight of `2n - 1`. The input is used as given; callers fold case.
pub fn vectorize(s: &str) -> FeatureVector {
    let mut vector = FeatureVector::default();
    let mut prev: Option<char> = None;
    for c in s.chars() {
        vector.add(Feature::Char(c));
        if let Some(p) = prev {
            vector.add(Feature::Pair(p, c));
        }
        prev = Some(c);
    }
    vector
}
