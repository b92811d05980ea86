//! Invocation boundary
//!
//! One invocation: check the event against the self-trigger guard, fetch the
//! two input datasets, merge them, and write the result under `processed/`.
//! Nothing propagates uncaught past [`handle`]; every failure is translated
//! into a status envelope. No partial output survives a failed run: the store
//! write is the last step and is itself atomic.

use serde::Serialize;

use crate::error::{MergeError, Result, config_missing};
use crate::event::InvocationEvent;
use crate::merge::{self, MergePolicy};
use crate::storage::ObjectStore;
use crate::table::Table;

/// Canonical input key for the anxiety-survey dataset.
pub const ANXIETY_KEY: &str = "SF_HOMELESS_ANXIETY.csv";
/// Canonical input key for the demographics dataset.
pub const DEMOGRAPHICS_KEY: &str = "SF_HOMELESS_DEMOGRAPHICS.csv";
/// Key the merged dataset is written to, overwritten on every run.
pub const OUTPUT_KEY: &str = "processed/merged_data.csv";
/// Prefix guarded against self-triggering.
pub const OUTPUT_PREFIX: &str = "processed/";
/// Input namespace used by deployments that stage uploads under `raw/`.
pub const RAW_PREFIX: &str = "raw/";
/// The join key: the person identifier shared by both datasets.
pub const JOIN_KEY: &str = "HID";
/// Environment variable naming the bucket.
pub const BUCKET_ENV: &str = "SURVEYMERGE_BUCKET";

/// The result envelope reported back to the invoking platform.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn from_error(err: &MergeError) -> Self {
        Self {
            status_code: err.status_code(),
            body: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Read the bucket name from the environment. Absence or an empty value is a
/// client-input failure reported at entry, not a crash.
pub fn bucket_from_env() -> Result<String> {
    match std::env::var(BUCKET_ENV) {
        Ok(bucket) if !bucket.is_empty() => Ok(bucket),
        _ => Err(config_missing(BUCKET_ENV)),
    }
}

enum Outcome {
    Merged { rows: usize },
    SkippedOutputEvent,
}

/// Run one invocation against `store`, translating every failure into an
/// envelope.
pub fn handle(
    store: &dyn ObjectStore,
    event: Option<&InvocationEvent>,
    policy: &MergePolicy,
) -> Response {
    match run_pipeline(store, event, policy) {
        Ok(Outcome::Merged { rows }) => Response::ok(format!(
            "Merged dataset uploaded to {OUTPUT_KEY} ({rows} rows)"
        )),
        Ok(Outcome::SkippedOutputEvent) => Response::ok(format!(
            "Event concerns only objects under {OUTPUT_PREFIX}; nothing to do"
        )),
        Err(err) => Response::from_error(&err),
    }
}

fn run_pipeline(
    store: &dyn ObjectStore,
    event: Option<&InvocationEvent>,
    policy: &MergePolicy,
) -> Result<Outcome> {
    if let Some(event) = event {
        if event.is_output_only(OUTPUT_PREFIX) {
            return Ok(Outcome::SkippedOutputEvent);
        }
    }

    let (anxiety_key, demographics_key) = input_keys(policy);
    let anxiety = Table::from_csv(&anxiety_key, &store.get(&anxiety_key)?)?;
    let demographics = Table::from_csv(&demographics_key, &store.get(&demographics_key)?)?;

    let merged = merge::merge(anxiety, demographics, JOIN_KEY, policy)?;
    let rows = merged.len();
    store.put(OUTPUT_KEY, &merged.to_csv()?)?;

    Ok(Outcome::Merged { rows })
}

/// The two input keys for this deployment variant.
pub fn input_keys(policy: &MergePolicy) -> (String, String) {
    if policy.raw_prefix {
        (
            format!("{RAW_PREFIX}{ANXIETY_KEY}"),
            format!("{RAW_PREFIX}{DEMOGRAPHICS_KEY}"),
        )
    } else {
        (ANXIETY_KEY.to_string(), DEMOGRAPHICS_KEY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::JoinMode;
    use crate::storage::MemoryStore;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put(ANXIETY_KEY, b"HID,anx\n1,high\n2,low\n")
            .unwrap();
        store
            .put(DEMOGRAPHICS_KEY, b"HID,age\n1,30\n3,40\n")
            .unwrap();
        store
    }

    fn lenient() -> MergePolicy {
        MergePolicy {
            mode: JoinMode::Lenient,
            ..MergePolicy::default()
        }
    }

    #[test]
    fn test_strict_run_writes_inner_join() {
        let store = seeded_store();
        let response = handle(&store, None, &MergePolicy::default());
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("1 rows"));
        assert_eq!(store.get(OUTPUT_KEY).unwrap(), b"HID,anx,age\n1,high,30\n");
    }

    #[test]
    fn test_lenient_run_writes_outer_join() {
        let store = seeded_store();
        let response = handle(&store, None, &lenient());
        assert_eq!(response.status_code, 200);
        assert_eq!(
            store.get(OUTPUT_KEY).unwrap(),
            b"HID,anx,age\n1,high,30\n2,low,\n3,,40\n"
        );
    }

    #[test]
    fn test_strict_missing_key_writes_nothing() {
        let store = MemoryStore::new();
        store.put(ANXIETY_KEY, b"HID,anx\n1,high\n").unwrap();
        store.put(DEMOGRAPHICS_KEY, b"age\n30\n").unwrap();
        let response = handle(&store, None, &MergePolicy::default());
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("HID"));
        assert!(!store.contains(OUTPUT_KEY));
    }

    #[test]
    fn test_missing_input_object_is_internal_failure() {
        let store = MemoryStore::new();
        store.put(ANXIETY_KEY, b"HID,anx\n1,high\n").unwrap();
        let response = handle(&store, None, &MergePolicy::default());
        assert_eq!(response.status_code, 500);
        assert!(response.body.contains(DEMOGRAPHICS_KEY));
        assert!(!store.contains(OUTPUT_KEY));
    }

    #[test]
    fn test_malformed_input_is_internal_failure() {
        let store = MemoryStore::new();
        store.put(ANXIETY_KEY, b"HID,anx\n1,high,extra\n").unwrap();
        store.put(DEMOGRAPHICS_KEY, b"HID,age\n1,30\n").unwrap();
        let response = handle(&store, None, &MergePolicy::default());
        assert_eq!(response.status_code, 500);
        assert!(!store.contains(OUTPUT_KEY));
    }

    #[test]
    fn test_output_prefix_event_is_noop() {
        let store = seeded_store();
        let event = InvocationEvent::from_json(
            br#"{"records": [{"key": "processed/merged_data.csv"}]}"#,
        )
        .unwrap();
        let response = handle(&store, Some(&event), &MergePolicy::default());
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("nothing to do"));
        assert!(!store.contains(OUTPUT_KEY));
    }

    #[test]
    fn test_input_event_still_merges() {
        let store = seeded_store();
        let event =
            InvocationEvent::from_json(br#"{"records": [{"key": "SF_HOMELESS_ANXIETY.csv"}]}"#)
                .unwrap();
        let response = handle(&store, Some(&event), &MergePolicy::default());
        assert_eq!(response.status_code, 200);
        assert!(store.contains(OUTPUT_KEY));
    }

    #[test]
    fn test_raw_prefix_variant_reads_namespaced_inputs() {
        let store = MemoryStore::new();
        store
            .put("raw/SF_HOMELESS_ANXIETY.csv", b"HID,anx\n1,high\n")
            .unwrap();
        store
            .put("raw/SF_HOMELESS_DEMOGRAPHICS.csv", b"HID,age\n1,30\n")
            .unwrap();
        let policy = MergePolicy {
            raw_prefix: true,
            ..MergePolicy::default()
        };
        let response = handle(&store, None, &policy);
        assert_eq!(response.status_code, 200);
        assert_eq!(store.get(OUTPUT_KEY).unwrap(), b"HID,anx,age\n1,high,30\n");
    }

    #[test]
    fn test_repeated_runs_are_byte_identical() {
        let store = seeded_store();
        assert!(handle(&store, None, &lenient()).is_success());
        let first = store.get(OUTPUT_KEY).unwrap();
        assert!(handle(&store, None, &lenient()).is_success());
        assert_eq!(store.get(OUTPUT_KEY).unwrap(), first);
    }

    #[test]
    fn test_response_serializes_as_envelope() {
        let response = Response::ok("done");
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status_code":200,"body":"done"}"#);
    }
}
