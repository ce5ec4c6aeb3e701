//! RPN computation and fault ranking.
//!
//! The Risk Priority Number of a fault is severity × occurrence × detection,
//! taken from the fault's overlay record. It is always recomputed from the
//! current overlay and never stored.

use serde::Serialize;

use crate::overlay::{FaultData, FmeaData, RatingValue};
use crate::tree::FaultNode;

/// Value used for a rating that is missing, unparseable or zero.
pub const IDENTITY_RATING: f64 = 1.0;

/// Text shown for a fault without an effect.
pub const NO_EFFECT: &str = "No effect specified";

/// The rating actually used in the RPN product.
///
/// Missing values, values that do not coerce to a number and zero all count
/// as 1 so that an unrated factor never zeroes out the RPN.
#[must_use]
pub fn effective_rating(value: Option<&RatingValue>) -> f64 {
    let n = value.map_or(0.0, RatingValue::to_number);
    if n.is_nan() || n == 0.0 {
        IDENTITY_RATING
    } else {
        n
    }
}

/// The RPN of one overlay record.
#[must_use]
pub fn rpn(data: &FaultData) -> f64 {
    effective_rating(data.severity.as_ref())
        * effective_rating(data.occurrence.as_ref())
        * effective_rating(data.detection.as_ref())
}

/// A fault with its computed RPN and the overlay record it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFault {
    /// The template fault node.
    #[serde(flatten)]
    pub fault: FaultNode,
    /// Computed risk priority number.
    pub rpn: f64,
    /// The overlay record, empty if the fault has none.
    pub fault_data: FaultData,
}

impl RankedFault {
    /// Rank one fault against its overlay record.
    #[must_use]
    pub fn new(fault: FaultNode, fault_data: FaultData) -> Self {
        let rpn = rpn(&fault_data);
        Self {
            fault,
            rpn,
            fault_data,
        }
    }

    /// Label to display: the edited failure mode, else the node name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.fault_data.failure_mode.as_deref() {
            Some(mode) if !mode.is_empty() => mode,
            _ => &self.fault.name,
        }
    }

    /// Effect to display: the overlay effect, else [`NO_EFFECT`].
    #[must_use]
    pub fn display_effect(&self) -> &str {
        match self.fault_data.effect.as_deref() {
            Some(effect) if !effect.is_empty() => effect,
            _ => NO_EFFECT,
        }
    }
}

/// Compute the RPN of every fault of a function and sort by descending RPN.
///
/// Faults are looked up in `data` under `owner_id` / `function_id`; a fault
/// without a record gets an empty one. The sort is stable, so faults with
/// equal RPN keep their input order.
#[must_use]
pub fn rank_faults<'a, I>(
    faults: I,
    data: &FmeaData,
    owner_id: &str,
    function_id: &str,
) -> Vec<RankedFault>
where
    I: IntoIterator<Item = &'a FaultNode>,
{
    let mut ranked: Vec<RankedFault> = faults
        .into_iter()
        .map(|fault| {
            let fault_data = data
                .fault(owner_id, function_id, &fault.id)
                .cloned()
                .unwrap_or_default();
            RankedFault::new(fault.clone(), fault_data)
        })
        .collect();
    sort_by_rpn(&mut ranked);
    ranked
}

/// Stable sort by descending RPN.
pub fn sort_by_rpn(ranked: &mut [RankedFault]) {
    ranked.sort_by(|a, b| b.rpn.total_cmp(&a.rpn));
}

/// The highest RPN of an already ranked list, `0.0` when it is empty.
#[must_use]
pub fn highest_rpn(ranked: &[RankedFault]) -> f64 {
    ranked.first().map_or(0.0, |fault| fault.rpn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(id: &str) -> FaultNode {
        FaultNode::new(id, id, "")
    }

    fn rated(s: u32, o: u32, d: u32) -> FaultData {
        FaultData::default()
            .with_severity(s)
            .with_occurrence(o)
            .with_detection(d)
    }

    fn data_for(records: &[(&str, FaultData)]) -> FmeaData {
        let mut data = FmeaData::new();
        for (id, record) in records {
            data.merge_fault("engine", "thrust", id, record.clone());
        }
        data
    }

    #[test]
    fn test_effective_rating_defaults() {
        assert!((effective_rating(None) - 1.0).abs() < f64::EPSILON);
        assert!((effective_rating(Some(&RatingValue::from(0_u32))) - 1.0).abs() < f64::EPSILON);
        assert!((effective_rating(Some(&RatingValue::from("abc"))) - 1.0).abs() < f64::EPSILON);
        assert!((effective_rating(Some(&RatingValue::from(""))) - 1.0).abs() < f64::EPSILON);
        assert!((effective_rating(Some(&RatingValue::from("7"))) - 7.0).abs() < f64::EPSILON);
        assert!((effective_rating(Some(&RatingValue::from(4_u32))) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_rating_rejects_rust_float_spellings() {
        for text in ["inf", "INF", "infinity", "-inf", "nan", "NaN"] {
            let rating = effective_rating(Some(&RatingValue::from(text)));
            assert!((rating - 1.0).abs() < f64::EPSILON, "{text} rated {rating}");
        }
        assert!((rpn(&FaultData::default().with_severity("inf")) - 1.0).abs() < f64::EPSILON);
        assert!(effective_rating(Some(&RatingValue::from(" Infinity "))).is_infinite());
    }

    #[test]
    fn test_rpn_missing_fields_are_one() {
        let only_severity = FaultData::default().with_severity(5_u32);
        assert!((rpn(&only_severity) - 5.0).abs() < f64::EPSILON);
        assert!((rpn(&FaultData::default()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rpn_product() {
        assert!((rpn(&rated(9, 4, 3)) - 108.0).abs() < f64::EPSILON);
        assert!((rpn(&rated(10, 8, 7)) - 560.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_faults_sorted_descending() {
        let faults = vec![fault("low"), fault("high"), fault("mid")];
        let data = data_for(&[
            ("low", rated(1, 2, 3)),
            ("high", rated(9, 9, 9)),
            ("mid", rated(5, 5, 5)),
        ]);

        let ranked = rank_faults(&faults, &data, "engine", "thrust");
        let ids: Vec<&str> = ranked.iter().map(|r| r.fault.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        assert!((highest_rpn(&ranked) - 729.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_faults_is_stable() {
        let faults = vec![fault("a"), fault("b"), fault("c"), fault("d")];
        let data = data_for(&[
            ("a", rated(2, 3, 1)),
            ("b", rated(1, 1, 1)),
            ("c", rated(3, 2, 1)),
            ("d", rated(6, 1, 1)),
        ]);

        let ranked = rank_faults(&faults, &data, "engine", "thrust");
        let ids: Vec<&str> = ranked.iter().map(|r| r.fault.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_rank_faults_missing_record() {
        let faults = vec![fault("unrated")];
        let ranked = rank_faults(&faults, &FmeaData::new(), "engine", "thrust");
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].rpn - 1.0).abs() < f64::EPSILON);
        assert!(ranked[0].fault_data.is_empty());
    }

    #[test]
    fn test_rank_faults_ignores_other_functions() {
        let faults = vec![fault("stall")];
        let mut data = FmeaData::new();
        data.merge_fault("engine", "other", "stall", rated(9, 9, 9));
        let ranked = rank_faults(&faults, &data, "engine", "thrust");
        assert!((ranked[0].rpn - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_faults_sees_overlay_changes() {
        let faults = vec![fault("a"), fault("b")];
        let mut data = data_for(&[("a", rated(5, 5, 5)), ("b", rated(2, 2, 2))]);
        let first = rank_faults(&faults, &data, "engine", "thrust");
        assert_eq!(first[0].fault.id, "a");

        data.merge_fault("engine", "thrust", "b", FaultData::default().with_severity(100_u32));
        let second = rank_faults(&faults, &data, "engine", "thrust");
        assert_eq!(second[0].fault.id, "b");
        assert!((second[0].rpn - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_empty() {
        let ranked = rank_faults(std::iter::empty(), &FmeaData::new(), "x", "y");
        assert!(ranked.is_empty());
        assert!(highest_rpn(&ranked).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_name_and_effect() {
        let plain = RankedFault::new(fault("stall"), FaultData::default());
        assert_eq!(plain.display_name(), "stall");
        assert_eq!(plain.display_effect(), NO_EFFECT);

        let edited = RankedFault::new(
            fault("stall"),
            FaultData::default()
                .with_failure_mode("Compressor stall")
                .with_effect("Thrust loss"),
        );
        assert_eq!(edited.display_name(), "Compressor stall");
        assert_eq!(edited.display_effect(), "Thrust loss");

        let blank = RankedFault::new(fault("stall"), FaultData::default().with_failure_mode(""));
        assert_eq!(blank.display_name(), "stall");
    }

    #[test]
    fn test_ranked_fault_serializes_flat() {
        let ranked = RankedFault::new(fault("stall"), rated(2, 3, 4));
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], "stall");
        assert_eq!(json["rpn"], 24.0);
        assert_eq!(json["faultData"]["severity"], 2.0);
    }
}
