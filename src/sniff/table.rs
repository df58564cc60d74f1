//! Field-count profile of a sample parsed with one candidate dialect.

use foldhash::{HashMap, HashMapExt};
use std::io::Cursor;

use super::candidates::Candidate;
use crate::metadata::Quote;

/// Number of fields in each parsed row of the sample.
#[derive(Debug, Clone, Default)]
pub struct FieldCounts {
    /// Field count of each row, in order.
    pub counts: Vec<usize>,
    modal: usize,
    modal_freq: usize,
}

impl FieldCounts {
    /// Build a profile from raw per-row counts.
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let (modal, modal_freq) = modal_field_count(&counts);
        Self {
            counts,
            modal,
            modal_freq,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.counts.len()
    }

    /// Returns the modal (most common) field count.
    #[inline]
    pub fn modal(&self) -> usize {
        self.modal
    }

    /// Returns how many rows have the modal field count.
    #[inline]
    pub fn modal_freq(&self) -> usize {
        self.modal_freq
    }

    pub fn min(&self) -> usize {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// True when every row has the same number of fields.
    pub fn is_uniform(&self) -> bool {
        self.counts.windows(2).all(|w| w[0] == w[1])
    }
}

/// Ties prefer the higher field count so results don't depend on map order.
fn modal_field_count(counts: &[usize]) -> (usize, usize) {
    let mut freq: HashMap<usize, usize> = HashMap::with_capacity(counts.len());
    for &fc in counts {
        *freq.entry(fc).or_insert(0) += 1;
    }

    freq.into_iter()
        .max_by(|(fc_a, n_a), (fc_b, n_b)| n_a.cmp(n_b).then_with(|| fc_a.cmp(fc_b)))
        .unwrap_or((0, 0))
}

/// Parse the (LF-normalised) sample with the candidate and record field counts.
///
/// Parsing stops quietly at the first record the candidate cannot read.
pub fn profile_sample(data: &[u8], candidate: &Candidate) -> FieldCounts {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(candidate.delimiter)
        .has_headers(false)
        .flexible(true);

    match candidate.quote {
        Quote::None => {
            builder.quoting(false);
        }
        Quote::Some(q) => {
            builder.quoting(true).quote(q);
        }
    }

    let mut reader = builder.from_reader(Cursor::new(data));
    let mut record = csv::ByteRecord::new();
    let mut counts = Vec::new();

    while let Ok(true) = reader.read_byte_record(&mut record) {
        counts.push(record.len());
    }

    FieldCounts::from_counts(counts)
}
