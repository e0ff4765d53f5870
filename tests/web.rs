//! Checks the JS shape of persisted data; runs in a browser via wasm-pack test
#![cfg(target_arch = "wasm32")]

use ezapply::capture::FrameReport;
use ezapply::job::{Job, JobStatus};
use ezapply::storage::JobCollection;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn sample_job() -> Job {
    Job {
        id: "job-1".to_string(),
        title: "Backend Engineer".to_string(),
        company: "Spotify".to_string(),
        url: "https://www.spotify.com/jobs/123".to_string(),
        note: String::new(),
        priority: true,
        status: JobStatus::Applied,
        created_at: 1_700_000_000_000,
    }
}

#[wasm_bindgen_test]
fn test_job_collection_is_js_array() {
    let collection = JobCollection::from_jobs(vec![sample_job()]);

    let value = serde_wasm_bindgen::to_value(&collection).unwrap();
    assert!(js_sys::Array::is_array(&value));

    let first = js_sys::Reflect::get(&value, &JsValue::from_f64(0.0)).unwrap();
    let created = js_sys::Reflect::get(&first, &JsValue::from_str("createdAt")).unwrap();
    assert_eq!(created.as_f64(), Some(1_700_000_000_000.0));
    let status = js_sys::Reflect::get(&first, &JsValue::from_str("status")).unwrap();
    assert_eq!(status.as_string().as_deref(), Some("applied"));

    let back: JobCollection = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(back, collection);
}

#[wasm_bindgen_test]
fn test_reads_records_written_by_older_versions() {
    let value = js_sys::JSON::parse(
        r#"[{"id":"1","title":"Designer","status":"inbox","notes":"ping","createdAt":1700000000000}]"#,
    )
    .unwrap();

    let collection: JobCollection = serde_wasm_bindgen::from_value(value).unwrap();

    assert_eq!(collection.len(), 1);
    assert_eq!(collection.jobs[0].note, "ping");
    assert!(!collection.jobs[0].priority);
}

#[wasm_bindgen_test]
fn test_frame_reports_from_bridge() {
    let value = js_sys::JSON::parse(
        r#"[
            {"frameId":0,"snapshot":{"selection":null,"titleMatches":[null,"Senior PM"],"companyMatches":[]},"error":null},
            {"frameId":4,"snapshot":null,"error":"Cannot access contents of the page"}
        ]"#,
    )
    .unwrap();

    let reports: Vec<FrameReport> = serde_wasm_bindgen::from_value(value).unwrap();
    let results: Vec<_> = reports.into_iter().map(FrameReport::into_result).collect();

    let snapshot = results[0].as_ref().unwrap();
    assert_eq!(snapshot.title_matches[1].as_deref(), Some("Senior PM"));
    assert!(results[1].is_err());
}
