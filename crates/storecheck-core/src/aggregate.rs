//! The aggregator: de-duplicate answer rows and sum their points.
//!
//! Answer rows are append-only, so a question can have many rows. Only the
//! most recent one counts, ordered by `(created_at, sequence)`. Two rows with
//! the same timestamp are resolved by the backend's insertion sequence, so
//! exactly one row is retained per question.

use std::collections::HashMap;

use storecheck_contracts::{
    answer::AnswerRecord,
    catalog::{Catalog, QuestionId, SectionId},
};

/// Keep the most recent row per question.
pub fn latest_answers<I>(rows: I) -> HashMap<QuestionId, AnswerRecord>
where
    I: IntoIterator<Item = AnswerRecord>,
{
    let mut latest: HashMap<QuestionId, AnswerRecord> = HashMap::new();
    for row in rows {
        let newer = latest
            .get(&row.question_id)
            .map_or(true, |existing| row.recency() > existing.recency());
        if newer {
            latest.insert(row.question_id, row);
        }
    }
    latest
}

/// Sum of points over current answers.
pub fn audit_total(current: &HashMap<QuestionId, AnswerRecord>) -> f64 {
    current.values().map(|r| r.points).sum()
}

/// Sum of points over current answers that belong to `section`.
pub fn section_subtotal(
    catalog: &Catalog,
    section: SectionId,
    current: &HashMap<QuestionId, AnswerRecord>,
) -> f64 {
    catalog
        .questions_in(section)
        .iter()
        .filter_map(|q| current.get(&q.id))
        .map(|r| r.points)
        .sum()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use storecheck_contracts::{
        answer::{AnswerId, AnswerValue},
        audit::AuditId,
        catalog::{Question, Section},
    };

    use super::*;

    fn row(question: u64, value: AnswerValue, points: f64, secs: i64, sequence: u64) -> AnswerRecord {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        AnswerRecord {
            id: AnswerId::new(),
            audit_id: AuditId::new(),
            question_id: QuestionId(question),
            value: Some(value),
            raw_value: value.label().to_string(),
            points,
            note: None,
            attachment: None,
            created_at: base + Duration::seconds(secs),
            sequence,
        }
    }

    #[test]
    fn later_timestamp_wins() {
        let rows = vec![
            row(1, AnswerValue::Yes, 1.0, 0, 0),
            row(1, AnswerValue::No, -1.0, 60, 1),
        ];
        let current = latest_answers(rows);
        assert_eq!(current.len(), 1);
        assert_eq!(current[&QuestionId(1)].value, Some(AnswerValue::No));
        assert_eq!(audit_total(&current), -1.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let rows = vec![
            row(1, AnswerValue::No, -1.0, 60, 1),
            row(1, AnswerValue::Yes, 1.0, 0, 0),
        ];
        assert_eq!(audit_total(&latest_answers(rows)), -1.0);
    }

    #[test]
    fn equal_timestamps_fall_back_to_sequence() {
        let rows = vec![
            row(1, AnswerValue::Regular, 0.5, 10, 7),
            row(1, AnswerValue::Yes, 1.0, 10, 3),
        ];
        let current = latest_answers(rows);
        assert_eq!(current[&QuestionId(1)].value, Some(AnswerValue::Regular));
    }

    #[test]
    fn yes_no_regular_totals_half_point() {
        let rows = vec![
            row(1, AnswerValue::Yes, 1.0, 0, 0),
            row(2, AnswerValue::No, -1.0, 1, 1),
            row(3, AnswerValue::Regular, 0.5, 2, 2),
        ];
        assert_eq!(audit_total(&latest_answers(rows)), 0.5);
    }

    #[test]
    fn subtotal_is_restricted_to_section() {
        let catalog = Catalog::new(
            vec![
                Section { id: SectionId(1), name: "A".into() },
                Section { id: SectionId(2), name: "B".into() },
            ],
            vec![
                Question { id: QuestionId(1), section_id: SectionId(1), text: "a1".into(), required: true },
                Question { id: QuestionId(2), section_id: SectionId(2), text: "b1".into(), required: true },
            ],
        )
        .unwrap();
        let current = latest_answers(vec![
            row(1, AnswerValue::Yes, 1.0, 0, 0),
            row(2, AnswerValue::Regular, 0.5, 0, 1),
        ]);

        assert_eq!(section_subtotal(&catalog, SectionId(1), &current), 1.0);
        assert_eq!(section_subtotal(&catalog, SectionId(2), &current), 0.5);
        assert_eq!(section_subtotal(&catalog, SectionId(9), &current), 0.0);
        assert_eq!(audit_total(&current), 1.5);
    }

    #[test]
    fn empty_rows_total_zero() {
        assert_eq!(audit_total(&latest_answers(Vec::new())), 0.0);
    }
}
