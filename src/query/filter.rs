//! Filter predicates and their AND-composition.
//!
//! Predicates are evaluated against the JSON form of a record, so one
//! implementation serves every entity. Field paths use dots to reach one
//! level into nested objects (`details.user_id`).

use super::time::{end_of_day, parse_timestamp};
use super::ListQuery;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Where a keyword search looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// A text field, compared case-insensitively.
    Field(&'static str),
    /// The serialized JSON of a (usually nested) field.
    Serialized(&'static str),
}

/// A single test a record must pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// String equality, or numeric equality when the record field is a number.
    Exact { field: &'static str, value: String },
    /// Case-insensitive substring over any of the targets.
    Keyword {
        targets: &'static [SearchTarget],
        needle: String,
    },
    /// Numeric equality on any of the paths.
    NumberEq {
        paths: &'static [&'static str],
        value: f64,
    },
    /// Inclusive numeric bounds.
    NumberRange {
        field: &'static str,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Inclusive timestamp bounds.
    DateRange {
        field: &'static str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    },
    /// Produced by an unusable query value; matches nothing.
    Never,
}

impl Predicate {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Predicate::Exact { field, value } => match lookup(record, field) {
                Some(Value::String(s)) => s == value,
                Some(Value::Number(n)) => match (n.as_f64(), coerce_number(value)) {
                    (Some(have), Some(want)) => have == want,
                    _ => false,
                },
                Some(Value::Bool(b)) => b.to_string() == *value,
                _ => false,
            },
            Predicate::Keyword { targets, needle } => targets.iter().any(|target| {
                let haystack = match target {
                    SearchTarget::Field(field) => match lookup(record, field) {
                        Some(Value::String(s)) => s.to_lowercase(),
                        Some(Value::Number(n)) => n.to_string(),
                        _ => return false,
                    },
                    SearchTarget::Serialized(field) => match lookup(record, field) {
                        Some(value) => value.to_string().to_lowercase(),
                        None => return false,
                    },
                };
                haystack.contains(needle.as_str())
            }),
            Predicate::NumberEq { paths, value } => paths.iter().any(|path| {
                lookup(record, path)
                    .and_then(Value::as_f64)
                    .is_some_and(|have| have == *value)
            }),
            Predicate::NumberRange { field, min, max } => {
                let Some(have) = lookup(record, field).and_then(Value::as_f64) else {
                    return false;
                };
                min.map_or(true, |min| have >= min) && max.map_or(true, |max| have <= max)
            }
            Predicate::DateRange { field, start, end } => {
                let Some(stamp) = lookup(record, field)
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp)
                else {
                    return false;
                };
                start.map_or(true, |start| stamp >= start) && end.map_or(true, |end| stamp <= end)
            }
            Predicate::Never => false,
        }
    }
}

/// AND-combination of predicates. An empty filter passes everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn builder(query: &ListQuery) -> FilterBuilder<'_> {
        FilterBuilder {
            query,
            predicates: Vec::new(),
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches_value(&self, record: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    pub fn matches<R: Serialize>(&self, record: &R) -> bool {
        if self.predicates.is_empty() {
            return true;
        }
        match serde_json::to_value(record) {
            Ok(value) => self.matches_value(&value),
            Err(e) => {
                warn!("Skipping record that failed to serialize for filtering: {}", e);
                false
            }
        }
    }

    /// Keep the records that pass, preserving their order.
    pub fn apply<R: Serialize>(&self, records: Vec<R>) -> Vec<R> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Turns recognized query keys into predicates. Keys that are absent or
/// empty contribute nothing.
pub struct FilterBuilder<'q> {
    query: &'q ListQuery,
    predicates: Vec<Predicate>,
}

impl<'q> FilterBuilder<'q> {
    pub fn exact(mut self, param: &str, field: &'static str) -> Self {
        if let Some(value) = self.query.get(param) {
            self.predicates.push(Predicate::Exact {
                field,
                value: value.to_string(),
            });
        }
        self
    }

    pub fn keyword(mut self, param: &str, targets: &'static [SearchTarget]) -> Self {
        if let Some(value) = self.query.get(param) {
            self.predicates.push(Predicate::Keyword {
                targets,
                needle: value.to_lowercase(),
            });
        }
        self
    }

    pub fn number_eq(mut self, param: &str, paths: &'static [&'static str]) -> Self {
        if let Some(raw) = self.query.get(param) {
            self.predicates.push(match coerce_number(raw) {
                Some(value) => Predicate::NumberEq { paths, value },
                None => Predicate::Never,
            });
        }
        self
    }

    pub fn number_range(mut self, min_param: &str, max_param: &str, field: &'static str) -> Self {
        let min = self.query.get(min_param).map(coerce_number);
        let max = self.query.get(max_param).map(coerce_number);
        if min.is_none() && max.is_none() {
            return self;
        }
        self.predicates.push(match (min, max) {
            (Some(None), _) | (_, Some(None)) => Predicate::Never,
            (min, max) => Predicate::NumberRange {
                field,
                min: min.flatten(),
                max: max.flatten(),
            },
        });
        self
    }

    /// Inclusive timestamp bounds; the end bound covers its whole calendar day.
    pub fn date_range(mut self, start_param: &str, end_param: &str, field: &'static str) -> Self {
        let start = self.query.get(start_param).map(parse_timestamp);
        let end = self
            .query
            .get(end_param)
            .map(|raw| parse_timestamp(raw).map(end_of_day));
        if start.is_none() && end.is_none() {
            return self;
        }
        self.predicates.push(match (start, end) {
            (Some(None), _) | (_, Some(None)) => Predicate::Never,
            (start, end) => Predicate::DateRange {
                field,
                start: start.flatten(),
                end: end.flatten(),
            },
        });
        self
    }

    pub fn build(self) -> Filter {
        Filter {
            predicates: self.predicates,
        }
    }
}

fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |node, key| node.get(key))
        .filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOG_SEARCH: &[SearchTarget] = &[
        SearchTarget::Field("message"),
        SearchTarget::Serialized("details"),
    ];
    const NAME_SEARCH: &[SearchTarget] = &[
        SearchTarget::Field("name"),
        SearchTarget::Field("mobile"),
        SearchTarget::Field("specialization"),
    ];

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        ListQuery::from_pairs(pairs.iter().copied())
    }

    fn coaches() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Zhang", "mobile": "13800138001", "status": "active", "specialization": "Strength"}),
            json!({"id": 2, "name": "Li", "mobile": "13800138002", "status": "active", "specialization": "Cardio"}),
            json!({"id": 3, "name": "Wang", "mobile": "13800138003", "status": "inactive", "specialization": "Yoga"}),
        ]
    }

    fn logs() -> Vec<Value> {
        vec![
            json!({"id": 1, "timestamp": "2025-04-14T09:10:30", "level": "info", "log_type": "membership",
                   "message": "Membership ID 2 revoked by admin ID 2", "user_id": 2,
                   "details": {"reason": "Issued twice", "user_id": 1, "admin_id": 2}}),
            json!({"id": 2, "timestamp": "2025-04-15T07:47:58", "level": "info", "log_type": "membership",
                   "message": "Membership created for user ID 7 by admin ID 2", "user_id": 2,
                   "details": {"type_id": 1, "user_id": 7, "admin_id": 2}}),
            json!({"id": 3, "timestamp": "2025-04-16T00:00:00", "level": "warn", "log_type": "system",
                   "message": "Settings updated", "user_id": 5, "details": {}}),
        ]
    }

    fn ids(records: &[Value]) -> Vec<i64> {
        records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    fn coach_filter(q: &ListQuery) -> Filter {
        Filter::builder(q)
            .keyword("search", NAME_SEARCH)
            .exact("status", "status")
            .build()
    }

    fn log_filter(q: &ListQuery) -> Filter {
        Filter::builder(q)
            .exact("level", "level")
            .exact("log_type", "log_type")
            .number_eq("user_id", &["user_id", "details.user_id"])
            .date_range("start_date", "end_date", "timestamp")
            .keyword("search", LOG_SEARCH)
            .build()
    }

    #[test]
    fn test_empty_query_builds_empty_filter() {
        let q = query(&[("status", ""), ("search", "  ")]);
        assert!(coach_filter(&q).is_empty());
        assert_eq!(coach_filter(&q).apply(coaches()).len(), 3);
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let q = query(&[("status", "inactive")]);
        assert_eq!(ids(&coach_filter(&q).apply(coaches())), vec![3]);

        let q = query(&[("status", "Inactive")]);
        assert!(coach_filter(&q).apply(coaches()).is_empty());
    }

    #[test]
    fn test_exact_match_coerces_numbers() {
        let q = query(&[("id", "2.0")]);
        let filter = Filter::builder(&q).exact("id", "id").build();
        assert_eq!(ids(&filter.apply(coaches())), vec![2]);
    }

    #[test]
    fn test_keyword_matches_any_field_case_insensitively() {
        let q = query(&[("search", "YOGA")]);
        assert_eq!(ids(&coach_filter(&q).apply(coaches())), vec![3]);

        let q = query(&[("search", "138002")]);
        assert_eq!(ids(&coach_filter(&q).apply(coaches())), vec![2]);
    }

    #[test]
    fn test_keyword_searches_serialized_details() {
        let q = query(&[("search", "issued twice")]);
        assert_eq!(ids(&log_filter(&q).apply(logs())), vec![1]);
    }

    #[test]
    fn test_number_eq_checks_top_level_or_details() {
        let q = query(&[("user_id", "7")]);
        assert_eq!(ids(&log_filter(&q).apply(logs())), vec![2]);

        let q = query(&[("user_id", "2")]);
        assert_eq!(ids(&log_filter(&q).apply(logs())), vec![1, 2]);
    }

    #[test]
    fn test_non_numeric_value_matches_nothing() {
        let q = query(&[("user_id", "two")]);
        assert!(log_filter(&q).apply(logs()).is_empty());
    }

    #[test]
    fn test_end_date_covers_whole_day() {
        let records = vec![
            json!({"id": 1, "timestamp": "2025-04-15T23:59:59.999"}),
            json!({"id": 2, "timestamp": "2025-04-16T00:00:00.000"}),
        ];
        let q = query(&[("end_date", "2025-04-15")]);
        let filter = Filter::builder(&q)
            .date_range("start_date", "end_date", "timestamp")
            .build();
        assert_eq!(ids(&filter.apply(records)), vec![1]);
    }

    #[test]
    fn test_start_date_is_inclusive() {
        let q = query(&[("start_date", "2025-04-15T07:47:58")]);
        assert_eq!(ids(&log_filter(&q).apply(logs())), vec![2, 3]);
    }

    #[test]
    fn test_unparseable_bound_matches_nothing() {
        let q = query(&[("start_date", "not-a-date")]);
        assert!(log_filter(&q).apply(logs()).is_empty());
    }

    #[test]
    fn test_number_range_bounds_independently() {
        let records = vec![
            json!({"id": 1, "remaining_sessions": 0}),
            json!({"id": 2, "remaining_sessions": 5}),
            json!({"id": 3, "remaining_sessions": 10}),
        ];
        let build = |q: &ListQuery| {
            Filter::builder(q)
                .number_range("remaining_sessions_min", "remaining_sessions_max", "remaining_sessions")
                .build()
        };

        let q = query(&[("remaining_sessions_min", "5")]);
        assert_eq!(ids(&build(&q).apply(records.clone())), vec![2, 3]);

        let q = query(&[("remaining_sessions_min", "1"), ("remaining_sessions_max", "9")]);
        assert_eq!(ids(&build(&q).apply(records.clone())), vec![2]);

        let q = query(&[("remaining_sessions_max", "x")]);
        assert!(build(&q).apply(records).is_empty());
    }

    #[test]
    fn test_adding_filters_never_grows_the_result() {
        let steps: &[&[(&str, &str)]] = &[
            &[],
            &[("level", "info")],
            &[("level", "info"), ("log_type", "membership")],
            &[("level", "info"), ("log_type", "membership"), ("user_id", "1")],
            &[("level", "info"), ("log_type", "membership"), ("user_id", "1"), ("search", "revoked")],
        ];
        let mut previous = usize::MAX;
        for step in steps {
            let count = log_filter(&query(step)).apply(logs()).len();
            assert!(count <= previous, "{:?} grew the result", step);
            previous = count;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let q = query(&[("level", "info"), ("search", "membership")]);
        let filter = log_filter(&q);
        let once = filter.apply(logs());
        let twice = filter.apply(logs());
        assert_eq!(once, twice);
        assert_eq!(filter.apply(once.clone()), once);
    }

    #[test]
    fn test_null_fields_never_match() {
        let records = vec![json!({"id": 1, "cancellation_note": null})];
        let q = query(&[("note", "null")]);
        let filter = Filter::builder(&q).exact("note", "cancellation_note").build();
        assert!(filter.apply(records).is_empty());
    }
}
