//! Property-based tests for bayaan using proptest

use proptest::collection::{hash_map, vec};
use proptest::prelude::*;
use bayaan::prelude::*;
use std::collections::HashMap;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn json_capture(level: LogLevel) -> (Logger, MemoryWriter) {
    let buffer = MemoryWriter::new();
    let logger = Logger::builder()
        .level(level)
        .format(OutputFormat::Json)
        .include_caller(false)
        .output(Sink::new(buffer.clone(), false), false)
        .build()
        .unwrap();
    (logger, buffer)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let lowercase: LogLevel = format!("  {}  ", level.to_str().to_lowercase()).parse().unwrap();
        prop_assert_eq!(level, lowercase);
    }

    /// Test that LogLevel ordering agrees with rank
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 <= level2, level1.rank() <= level2.rank());
        prop_assert_eq!(level1 < level2, level1.rank() < level2.rank());
        prop_assert_eq!(level1.cmp(&level2), level1.rank().cmp(&level2.rank()));
    }

    /// Test that unknown names never parse
    #[test]
    fn test_unknown_level_names_rejected(name in "[a-z]{1,12}") {
        let known = ["trace", "debug", "info", "warn", "warning", "error", "fatal", "panic"];
        prop_assume!(!known.contains(&name.as_str()));
        prop_assert!(name.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Field Merge Tests
// ============================================================================

proptest! {
    /// Overrides win, every other base key survives
    #[test]
    fn test_merge_precedence(
        base in hash_map("[a-e]", any::<i64>(), 0..5),
        overrides in hash_map("[a-e]", any::<i64>(), 0..5),
    ) {
        let base_fields: Fields = base.clone().into_iter().collect();
        let override_fields: Fields = overrides.clone().into_iter().collect();
        let merged = Fields::merge(&base_fields, &override_fields);

        let mut expected: HashMap<String, i64> = base.clone();
        expected.extend(overrides.clone());

        prop_assert_eq!(merged.len(), expected.len());
        for (key, value) in &expected {
            prop_assert_eq!(merged.get(key), Some(&FieldValue::Int(*value)));
        }
        // Inputs are left untouched
        prop_assert_eq!(base_fields.len(), base.len());
        prop_assert_eq!(override_fields.len(), overrides.len());
    }

    /// Rendered text is identical for every insertion order
    #[test]
    fn test_sorted_fields_are_order_independent(
        entries in vec(("[a-z]{1,6}", any::<bool>()), 0..8),
    ) {
        let forward: Fields = entries.iter().cloned().collect();
        let backward: Fields = entries.iter().rev().cloned().collect();

        // Later duplicates win in each direction, so compare on unique keys only
        let mut seen = std::collections::HashSet::new();
        prop_assume!(entries.iter().all(|(k, _)| seen.insert(k.clone())));

        prop_assert_eq!(forward.to_string(), backward.to_string());
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Output holds exactly the messages at or above the threshold, in order
    #[test]
    fn test_filtering_preserves_order(
        threshold in any_level(),
        submissions in vec((any_level(), "[a-zA-Z0-9 ]{0,20}"), 0..60),
    ) {
        let (logger, buffer) = json_capture(threshold);
        for (level, message) in &submissions {
            prop_assert!(logger.log(*level, message, Fields::new()).is_accepted());
        }
        logger.close().unwrap();

        let expected: Vec<(String, String)> = submissions
            .iter()
            .filter(|(level, _)| *level >= threshold)
            .map(|(level, message)| (level.to_str().to_string(), message.clone()))
            .collect();
        let actual: Vec<(String, String)> = buffer
            .lines()
            .iter()
            .map(|line| {
                let record: serde_json::Value = serde_json::from_str(line).unwrap();
                (
                    record["level"].as_str().unwrap().to_string(),
                    record["message"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Messages with control characters never split a record
    #[test]
    fn test_one_record_per_entry(messages in vec(".{0,40}", 1..20)) {
        let buffer = MemoryWriter::new();
        let logger = Logger::builder()
            .format(OutputFormat::Logfmt)
            .output(Sink::new(buffer.clone(), false), false)
            .build()
            .unwrap();
        for message in &messages {
            logger.info(message, Fields::new());
        }
        logger.close().unwrap();

        prop_assert_eq!(buffer.lines().len(), messages.len());
    }
}
