//! Common test utilities for integration tests.
//!
//! Frame builders for the job progress stream and scripted mock servers.

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use bytes::Bytes;
use serde_json::{json, Value};

/// A `data:` frame with a trailing blank keep-alive line.
pub fn frame(payload: Value) -> String {
    format!("data: {}\n\n", payload)
}

pub fn progress_frame(step: &str, progress: i64) -> String {
    frame(json!({ "step": step, "message": format!("{} step", step), "progress": progress }))
}

pub fn error_frame(message: &str) -> String {
    frame(json!({ "step": "error", "message": message, "progress": 0 }))
}

/// A completed result with `count` successful items.
pub fn result_json(count: usize) -> Value {
    let results: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "source_file": format!("{}.wav", i),
                "voice_name": "Alice-Calm",
                "output_file": format!("/out/Alice/{}.wav", i),
                "file_size_mb": 1.5,
                "status": "success"
            })
        })
        .collect();
    json!({
        "success_count": count,
        "failed_count": 0,
        "total_files": count,
        "total_conversions": count,
        "total_time_minutes": 2.5,
        "output_directory": "/out",
        "results": results
    })
}

pub fn completed_frame(count: usize) -> String {
    frame(json!({
        "step": "completed",
        "message": "done",
        "progress": 100,
        "result": result_json(count)
    }))
}

/// The happy-path stream for a five-file batch.
pub fn happy_path_body() -> String {
    [
        frame(json!({"step": "initializing", "message": "準備中...", "progress": 0})),
        frame(json!({"step": "model_loaded", "message": "2個のVoiceを読み込み", "progress": 5, "voice_count": 1})),
        frame(json!({"step": "files_loaded", "message": "5 files", "progress": 10, "file_count": 5})),
        frame(json!({"step": "converting", "message": "3.wav", "progress": 55, "file_index": 3, "total_files": 5})),
        completed_frame(5),
    ]
    .concat()
}

/// Split `body` into chunks of `size` bytes.
pub fn chunked(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}
