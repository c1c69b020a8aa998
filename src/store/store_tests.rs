//! Unit tests for the interaction log writer and dashboard summary.

#[cfg(test)]
mod store_tests {
    use crate::error::LogError;
    use crate::sentiment::Sentiment;
    use crate::store::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn record(query: &str, sentiment: Sentiment) -> InteractionRecord {
        InteractionRecord::new(query.to_string(), format!("reply to {}", query), sentiment)
    }

    // ============= Append Tests =============

    #[tokio::test]
    async fn test_sequential_appends_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::spawn(dir.path().join("feedback.json"), 8);

        let mut written = Vec::new();
        for i in 0..5 {
            let r = record(&format!("question {}", i), Sentiment::Neutral);
            written.push(r.clone());
            log.append(r).await.unwrap();
        }

        let records = log.snapshot().await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records, written);
    }

    #[tokio::test]
    async fn test_log_created_lazily_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("feedback.json");
        let log = InteractionLog::spawn(path.clone(), 8);

        assert!(!path.exists());
        assert!(log.snapshot().await.unwrap().is_empty());

        log.append(record("hello", Sentiment::Neutral)).await.unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("data/nested/feedback.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_unrated_records_omit_rating_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let log = InteractionLog::spawn(path.clone(), 8);

        log.append(record("hello", Sentiment::Neutral)).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("user_rating"));
        assert!(raw.trim_start().starts_with('['));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["sentiment"], "Neutral");
        assert_eq!(value[0]["user_query"], "hello");
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::spawn(dir.path().join("feedback.json"), 4);

        let mut handles = Vec::new();
        for i in 0..32 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(record(&format!("caller {}", i), Sentiment::Positive))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = log.snapshot().await.unwrap();
        assert_eq!(records.len(), 32);
        let ids: HashSet<Uuid> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn test_append_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the log file should be
        let path = dir.path().join("feedback.json");
        std::fs::create_dir(&path).unwrap();

        let log = InteractionLog::spawn(path, 8);
        let result = log.append(record("hello", Sentiment::Neutral)).await;
        assert!(matches!(result, Err(LogError::Io(_))));
    }

    // ============= Tolerant Read Tests =============

    #[tokio::test]
    async fn test_empty_and_whitespace_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        let blank = dir.path().join("blank.json");
        std::fs::write(&empty, "").unwrap();
        std::fs::write(&blank, "  \n\t").unwrap();

        assert!(load_records(&empty).await.unwrap().is_empty());
        assert!(load_records(&blank).await.unwrap().is_empty());
        assert!(load_records(&dir.path().join("absent.json"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_log_reads_as_empty_and_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(&path, "[{\"user_query\": \"half a rec").unwrap();

        assert!(load_records(&path).await.unwrap().is_empty());

        let log = InteractionLog::spawn(path.clone(), 8);
        log.append(record("after corruption", Sentiment::Neutral))
            .await
            .unwrap();

        let records = log.snapshot().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_query, "after corruption");

        let copies = quarantined_copies(dir.path());
        assert_eq!(copies.len(), 1);
        assert!(copies[0].contains("half a rec"));
    }

    fn quarantined_copies(dir: &std::path::Path) -> Vec<String> {
        let mut copies: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("feedback.json.corrupt-")
            })
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();
        copies.sort();
        copies
    }

    #[tokio::test]
    async fn test_repeated_corruption_keeps_every_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let log = InteractionLog::spawn(path.clone(), 8);

        std::fs::write(&path, "FIRST-CORRUPT").unwrap();
        log.append(record("one", Sentiment::Neutral)).await.unwrap();
        std::fs::write(&path, "SECOND-CORRUPT").unwrap();
        log.append(record("two", Sentiment::Neutral)).await.unwrap();

        let copies = quarantined_copies(dir.path());
        assert_eq!(copies, vec!["FIRST-CORRUPT", "SECOND-CORRUPT"]);

        let records = log.snapshot().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_query, "two");
    }

    #[tokio::test]
    async fn test_non_array_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();

        assert!(load_records(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_records_without_id_or_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(
            &path,
            r#"[
  {
    "user_query": "Where can I pay property tax?",
    "reply": "At the municipal office.",
    "sentiment": "Neutral",
    "timestamp": "2025-06-01T10:11:12.123456"
  }
]"#,
        )
        .unwrap();

        let records = load_records(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentiment, Sentiment::Neutral);
        assert_eq!(records[0].user_rating, None);
        assert_eq!(
            records[0].timestamp.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );

        // Derived ids survive the first rewrite
        let log = InteractionLog::spawn(path.clone(), 8);
        log.append(record("next", Sentiment::Neutral)).await.unwrap();
        let first = log.snapshot().await.unwrap();
        let second = log.snapshot().await.unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_legacy_ids_stable_before_any_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(
            &path,
            r#"[
  {"user_query": "Same question", "reply": "Same answer", "sentiment": "Neutral",
   "timestamp": "2025-06-01T10:00:00"},
  {"user_query": "Same question", "reply": "Same answer", "sentiment": "Neutral",
   "timestamp": "2025-06-01T10:00:00"}
]"#,
        )
        .unwrap();

        let log = InteractionLog::spawn(path.clone(), 8);
        let first = log.snapshot().await.unwrap();
        let second = log.snapshot().await.unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[1].id, second[1].id);
        assert_ne!(first[0].id, first[1].id);
        assert!(!first[0].id.is_nil());

        // An id read from the dashboard rates the record it names
        let rated = log.rate(first[1].id, Rating::Positive).await.unwrap();
        assert_eq!(rated.id, first[1].id);

        let after = log.snapshot().await.unwrap();
        assert_eq!(after[0].id, first[0].id);
        assert_eq!(after[0].user_rating, None);
        assert_eq!(after[1].user_rating, Some(Rating::Positive));
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains(&first[1].id.to_string()));
    }

    // ============= Rating Tests =============

    #[tokio::test]
    async fn test_rate_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::spawn(dir.path().join("feedback.json"), 8);

        let target = record("second", Sentiment::Negative);
        log.append(record("first", Sentiment::Neutral)).await.unwrap();
        log.append(target.clone()).await.unwrap();
        log.append(record("third", Sentiment::Positive)).await.unwrap();

        let updated = log.rate(target.id, Rating::Positive).await.unwrap();
        assert_eq!(updated.id, target.id);
        assert_eq!(updated.user_rating, Some(Rating::Positive));

        let records = log.snapshot().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].user_rating, None);
        assert_eq!(records[1].user_rating, Some(Rating::Positive));
        assert_eq!(records[1].user_query, "second");
        assert_eq!(records[2].user_rating, None);

        // Rating again overwrites
        log.rate(target.id, Rating::Negative).await.unwrap();
        let records = log.snapshot().await.unwrap();
        assert_eq!(records[1].user_rating, Some(Rating::Negative));
    }

    #[tokio::test]
    async fn test_rate_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let log = InteractionLog::spawn(dir.path().join("feedback.json"), 8);
        log.append(record("only", Sentiment::Neutral)).await.unwrap();

        let missing = Uuid::new_v4();
        let result = log.rate(missing, Rating::Positive).await;
        assert!(matches!(result, Err(LogError::NotFound { id }) if id == missing));
    }

    #[test]
    fn test_rating_round_trip() {
        let mut r = record("hello", Sentiment::Positive);
        r.user_rating = Some(Rating::Negative);

        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"user_rating\":\"Negative\""));
        let back: InteractionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    // ============= Summary Tests =============

    fn dated(query: &str, sentiment: Sentiment, day: u32, rating: Option<Rating>) -> InteractionRecord {
        let mut r = record(query, sentiment);
        r.timestamp = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
        r.user_rating = rating;
        r
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], 10);
        assert_eq!(summary, InteractionSummary::default());
    }

    #[test]
    fn test_summarize_counts_and_trend() {
        let records = vec![
            dated("a", Sentiment::Positive, 1, Some(Rating::Positive)),
            dated("b", Sentiment::Negative, 1, None),
            dated("c", Sentiment::Positive, 1, Some(Rating::Negative)),
            dated("d", Sentiment::Neutral, 2, None),
        ];

        let summary = summarize(&records, 10);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.sentiment.positive, 2);
        assert_eq!(summary.sentiment.negative, 1);
        assert_eq!(summary.sentiment.neutral, 1);
        assert_eq!(summary.ratings.positive, 1);
        assert_eq!(summary.ratings.negative, 1);
        assert_eq!(summary.ratings.unrated, 2);

        assert_eq!(summary.daily.len(), 3);
        assert_eq!(summary.daily[0].sentiment, Sentiment::Positive);
        assert_eq!(summary.daily[0].count, 2);
        assert_eq!(summary.daily[1].sentiment, Sentiment::Negative);
        assert_eq!(summary.daily[2].date.to_string(), "2025-03-02");
    }

    #[test]
    fn test_summarize_recent_newest_first() {
        let records: Vec<_> = (1..=12)
            .map(|d| dated(&format!("q{}", d), Sentiment::Neutral, d, None))
            .collect();

        let summary = summarize(&records, 10);
        assert_eq!(summary.recent.len(), 10);
        assert_eq!(summary.recent[0].user_query, "q12");
        assert_eq!(summary.recent[9].user_query, "q3");
    }
}
