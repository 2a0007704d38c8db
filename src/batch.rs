//! Independent conversion of several inputs
//!
//! Each input is converted on its own; a failure is recorded in that input's
//! report and never prevents the remaining inputs from being converted.

use crate::converters::{AidxConverter, Conversion};
use crate::error::Result;
use crate::locations::Source;

/// One named input of a batch
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Display name, usually the uploaded file name
    pub name: String,
    /// Input to convert
    pub source: Source,
}

impl BatchItem {
    /// Create a batch item
    pub fn new(name: impl Into<String>, source: impl Into<Source>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Outcome for one input of a batch
#[derive(Debug)]
pub struct BatchReport {
    /// Name of the input
    pub name: String,
    /// Conversion result
    pub outcome: Result<Conversion>,
}

impl BatchReport {
    /// Check if this input converted successfully
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Success and failure counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Inputs converted successfully
    pub succeeded: usize,
    /// Inputs that failed
    pub failed: usize,
}

/// Convert every item, keeping input order in the reports
pub fn convert_batch<I>(converter: &AidxConverter, items: I) -> Vec<BatchReport>
where
    I: IntoIterator<Item = BatchItem>,
{
    items
        .into_iter()
        .map(|item| {
            let outcome = converter.convert_with_stats(&item.source);
            if let Err(ref e) = outcome {
                tracing::warn!(name = %item.name, error = %e, "batch item failed");
            }
            BatchReport {
                name: item.name,
                outcome,
            }
        })
        .collect()
}

/// Count successes and failures
pub fn summarize(reports: &[BatchReport]) -> BatchSummary {
    reports
        .iter()
        .fold(BatchSummary::default(), |mut summary, report| {
            if report.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_failure_does_not_abort_siblings() {
        let items = vec![
            BatchItem::new("first.xml", b"<Flight><Num>1</Num></Flight>".to_vec()),
            BatchItem::new("broken.xml", b"<Flight><Num>2</Flight>".to_vec()),
            BatchItem::new("third.xml", b"<Flight><Num>3</Num></Flight>".to_vec()),
        ];

        let reports = convert_batch(&AidxConverter::new(), items);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].name, "first.xml");
        assert!(reports[0].is_success());
        assert!(reports[2].is_success());

        let err = reports[1].outcome.as_ref().unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::MalformedXml));

        assert_eq!(
            summarize(&reports),
            BatchSummary {
                succeeded: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        let reports = convert_batch(&AidxConverter::new(), Vec::new());
        assert!(reports.is_empty());
        assert_eq!(summarize(&reports), BatchSummary::default());
    }
}
