//! Built-in aggregates for position groups.

use clap::ValueEnum;
use itertools::Itertools;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Labelled, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregateKind {
    /// Number of records at the position
    Count,
    /// Labels of the records at the position
    Labels,
    /// Sum of a numeric attribute
    Sum,
    /// Mean of a numeric attribute
    Mean,
    /// Minimum of a numeric attribute
    Min,
    /// Maximum of a numeric attribute
    Max,
}

impl AggregateKind {
    fn name(self) -> &'static str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Labels => "labels",
            AggregateKind::Sum => "sum",
            AggregateKind::Mean => "mean",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            AggregateKind::Sum | AggregateKind::Mean | AggregateKind::Min | AggregateKind::Max
        )
    }
}

/// An aggregate kind bound to the attribute it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    kind: AggregateKind,
    attribute: Option<String>,
}

impl Aggregate {
    /// Numeric kinds need an attribute name.
    pub fn new(kind: AggregateKind, attribute: Option<String>) -> ApplicationResult<Self> {
        if kind.is_numeric() && attribute.is_none() {
            return Err(ApplicationError::MissingAttribute {
                aggregate: kind.name().to_string(),
            });
        }
        Ok(Self { kind, attribute })
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    /// Evaluates the aggregate over one position group.
    ///
    /// Records without the attribute are skipped; a group where no record has
    /// it yields `-` (`0` for sums).
    pub fn apply(&self, position: usize, records: &[&Record]) -> ApplicationResult<String> {
        match self.kind {
            AggregateKind::Count => Ok(records.len().to_string()),
            AggregateKind::Labels => Ok(format!(
                "[{}]",
                records
                    .iter()
                    .map(|r| r.label().unwrap_or("-"))
                    .join(", ")
            )),
            AggregateKind::Sum => Ok(sum(&self.values(position, records)?).to_string()),
            AggregateKind::Mean => {
                let values = self.values(position, records)?;
                if values.is_empty() {
                    Ok("-".to_string())
                } else {
                    Ok((sum(&values) / values.len() as f64).to_string())
                }
            }
            AggregateKind::Min => Ok(self
                .values(position, records)?
                .into_iter()
                .reduce(f64::min)
                .map_or_else(|| "-".to_string(), |v| v.to_string())),
            AggregateKind::Max => Ok(self
                .values(position, records)?
                .into_iter()
                .reduce(f64::max)
                .map_or_else(|| "-".to_string(), |v| v.to_string())),
        }
    }

    fn values(&self, position: usize, records: &[&Record]) -> ApplicationResult<Vec<f64>> {
        let Some(attribute) = self.attribute.as_deref() else {
            return Err(ApplicationError::MissingAttribute {
                aggregate: self.kind.name().to_string(),
            });
        };
        records
            .iter()
            .filter_map(|record| record.attr(attribute))
            .map(|value| {
                value.as_f64().ok_or_else(|| ApplicationError::NotNumeric {
                    attribute: attribute.to_string(),
                    position,
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

// `Iterator::sum` for f64 starts at -0.0.
fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Vec<Record> {
        vec![
            Record::labelled("a").with_attr("w", 4),
            Record::new().with_attr("w", 2.5),
            Record::labelled("c"),
        ]
    }

    #[test]
    fn test_count_and_labels() {
        let records = group();
        let refs: Vec<&Record> = records.iter().collect();
        let count = Aggregate::new(AggregateKind::Count, None).unwrap();
        assert_eq!(count.apply(0, &refs).unwrap(), "3");
        let labels = Aggregate::new(AggregateKind::Labels, None).unwrap();
        assert_eq!(labels.apply(0, &refs).unwrap(), "[a, -, c]");
    }

    #[test]
    fn test_numeric_aggregates_skip_missing_attributes() {
        let records = group();
        let refs: Vec<&Record> = records.iter().collect();
        let run = |kind| {
            Aggregate::new(kind, Some("w".into()))
                .unwrap()
                .apply(0, &refs)
                .unwrap()
        };
        assert_eq!(run(AggregateKind::Sum), "6.5");
        assert_eq!(run(AggregateKind::Mean), "3.25");
        assert_eq!(run(AggregateKind::Min), "2.5");
        assert_eq!(run(AggregateKind::Max), "4");
    }

    #[test]
    fn test_numeric_aggregate_requires_attribute() {
        assert!(matches!(
            Aggregate::new(AggregateKind::Sum, None),
            Err(ApplicationError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_text_attribute_is_not_numeric() {
        let record = Record::new().with_attr("w", "wide");
        let aggregate = Aggregate::new(AggregateKind::Max, Some("w".into())).unwrap();
        assert!(matches!(
            aggregate.apply(2, &[&record]),
            Err(ApplicationError::NotNumeric { position: 2, .. })
        ));
    }

    #[test]
    fn test_sum_without_matching_attribute_is_positive_zero() {
        let records = group();
        let refs: Vec<&Record> = records.iter().collect();
        let sum = Aggregate::new(AggregateKind::Sum, Some("depth".into())).unwrap();
        assert_eq!(sum.apply(0, &refs).unwrap(), "0");
        assert_eq!(sum.apply(0, &[]).unwrap(), "0");
        let mean = Aggregate::new(AggregateKind::Mean, Some("depth".into())).unwrap();
        assert_eq!(mean.apply(0, &refs).unwrap(), "-");
    }
}
