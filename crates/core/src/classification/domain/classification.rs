/// One ranked entry of a classification: model class index and its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub class_index: usize,
    pub score: f32,
}

/// Top-K classifications, highest score first.
///
/// Scores within one result always share a scale: either dequantized
/// probabilities or the model's raw float outputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationResult {
    entries: Vec<Classification>,
}

impl ClassificationResult {
    /// Ranks `scores` (indexed by class) and keeps the best `top_k`.
    ///
    /// The sort is stable, so equal scores keep ascending class order and the
    /// ranking is deterministic for a given score vector. NaN scores rank
    /// below every real score.
    pub fn rank(scores: &[f32], top_k: usize) -> Self {
        let mut entries: Vec<Classification> = scores
            .iter()
            .enumerate()
            .map(|(class_index, &score)| Classification { class_index, score })
            .collect();
        entries.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
            (false, false) => b.score.total_cmp(&a.score),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        entries.truncate(top_k);
        Self { entries }
    }

    pub fn top(&self) -> Option<&Classification> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Classification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
