//! Date-range query for review documents.
//!
//! `created_at` is stored either as a native timestamp or as a string, so a
//! day query has two clauses: a half-open timestamp range over the UTC day,
//! or a `YYYY-MM-DD` string prefix.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::{Value, json};

use crate::document::{CreatedAt, ReviewDocument, ejson_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateQuery {
    day: NaiveDate,
}

impl DateQuery {
    pub fn for_day(day: NaiveDate) -> Self {
        Self { day }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Inclusive start: midnight UTC.
    pub fn start(&self) -> DateTime<Utc> {
        self.day.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Exclusive end: midnight UTC of the following day.
    pub fn end(&self) -> DateTime<Utc> {
        let next = self.day.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        next.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    pub fn prefix(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }

    /// Mongo-style extended-JSON filter.
    pub fn to_filter(&self) -> Value {
        json!({
            "$or": [
                { "created_at": { "$gte": ejson_date(self.start()), "$lt": ejson_date(self.end()) } },
                { "created_at": { "$regex": format!("^{}", self.prefix()) } },
            ]
        })
    }

    /// Same predicate as [`to_filter`](Self::to_filter), evaluated in process.
    pub fn matches(&self, document: &ReviewDocument) -> bool {
        match &document.created_at {
            Some(CreatedAt::Timestamp(ts)) => *ts >= self.start() && *ts < self.end(),
            Some(CreatedAt::Text(s)) => s.starts_with(&self.prefix()),
            None => false,
        }
    }
}

impl std::str::FromStr for DateQuery {
    type Err = chrono::ParseError;

    /// Parse a `YYYY-MM-DD` day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self::for_day)
    }
}
