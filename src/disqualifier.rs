/// Documents a domain must offer before the short-circuit check can trip.
const MIN_SAMPLE: usize = 25;

/// Tracks document quality across one domain and decides whether the rest of
/// the domain is worth extracting keywords from.
///
/// With `short_circuit` off (the default) every domain stays qualified; the
/// counters are still kept so that the decision can be logged.
#[derive(Debug, Clone)]
pub struct DocumentDisqualifier {
    min_avg_document_quality: f64,
    short_circuit: bool,
    count: usize,
    good_count: usize,
}

impl DocumentDisqualifier {
    pub fn new(min_avg_document_quality: f64, short_circuit: bool) -> Self {
        Self {
            min_avg_document_quality,
            short_circuit,
            count: 0,
            good_count: 0,
        }
    }

    pub fn offer(&mut self, quality: f64) {
        self.count += 1;
        if quality > self.min_avg_document_quality {
            self.good_count += 1;
        }
    }

    /// Qualified until at least 25 documents were seen and fewer than one in
    /// ten of them was good.
    pub fn is_qualified(&self) -> bool {
        if !self.short_circuit {
            return true;
        }
        self.count < MIN_SAMPLE || self.good_count * 10 >= self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn good_count(&self) -> usize {
        self.good_count
    }
}
