//! # Sentiment classifier
//! Scores a batch of headlines and partitions them into buy / not-buy.
//!
//! Pure, testable logic: the scorer is injected, nothing is stored. Scores keep
//! the input order so chart markers line up with headline indices.

use serde::Serialize;

use crate::error::ScoringError;
use crate::sentiment::Scorer;

/// Per-headline scores plus the indices that met the buy threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub threshold: f64,
    pub scores: Vec<f64>,
    /// Ascending positions `i` with `scores[i] >= threshold`.
    pub buy_indices: Vec<usize>,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.buy_indices.len()
    }

    pub fn not_buy_count(&self) -> usize {
        self.scores.len() - self.buy_indices.len()
    }

    pub fn is_buy(&self, i: usize) -> bool {
        self.scores.get(i).is_some_and(|s| *s >= self.threshold)
    }
}

/// Score every headline and mark the ones at or above `threshold` as buys.
///
/// Any threshold is accepted; values outside [-1, 1] simply put everything on
/// one side. A scorer failure aborts the whole batch.
pub fn classify<S, T>(
    scorer: &S,
    headlines: &[T],
    threshold: f64,
) -> Result<Classification, ScoringError>
where
    S: Scorer + ?Sized,
    T: AsRef<str>,
{
    let scores = headlines
        .iter()
        .map(|h| scorer.compound(h.as_ref()))
        .collect::<Result<Vec<f64>, _>>()?;

    let buy_indices = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s >= threshold)
        .map(|(i, _)| i)
        .collect();

    Ok(Classification {
        threshold,
        scores,
        buy_indices,
    })
}
