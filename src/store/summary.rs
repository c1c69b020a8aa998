//! Aggregates behind the dashboard's charts and tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{InteractionRecord, Rating};
use crate::sentiment::Sentiment;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub positive: u64,
    pub negative: u64,
    pub unrated: u64,
}

/// One point of the per-day trend line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub sentiment: Sentiment,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionSummary {
    pub total: u64,
    pub sentiment: SentimentCounts,
    pub ratings: RatingCounts,

    /// Sorted by date, then sentiment
    pub daily: Vec<DailySentiment>,

    /// Newest first
    pub recent: Vec<InteractionRecord>,
}

pub fn summarize(records: &[InteractionRecord], recent_limit: usize) -> InteractionSummary {
    let mut summary = InteractionSummary {
        total: records.len() as u64,
        ..Default::default()
    };
    let mut daily: BTreeMap<(NaiveDate, Sentiment), u64> = BTreeMap::new();

    for record in records {
        match record.sentiment {
            Sentiment::Positive => summary.sentiment.positive += 1,
            Sentiment::Negative => summary.sentiment.negative += 1,
            Sentiment::Neutral => summary.sentiment.neutral += 1,
        }
        match record.user_rating {
            Some(Rating::Positive) => summary.ratings.positive += 1,
            Some(Rating::Negative) => summary.ratings.negative += 1,
            None => summary.ratings.unrated += 1,
        }
        *daily
            .entry((record.timestamp.date_naive(), record.sentiment))
            .or_insert(0) += 1;
    }

    summary.daily = daily
        .into_iter()
        .map(|((date, sentiment), count)| DailySentiment {
            date,
            sentiment,
            count,
        })
        .collect();
    summary.recent = records.iter().rev().take(recent_limit).cloned().collect();
    summary
}
