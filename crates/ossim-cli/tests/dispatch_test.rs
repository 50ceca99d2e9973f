//! Wire contract tests.
//!
//! Each test feeds a JSON request through the dispatcher and pins the exact
//! pretty-printed response, so any change to field names, ordering or
//! labels shows up as a snapshot diff.

use ossim_cli::{CliError, OutputFormat, handle};
use ossim_core::{InputError, Limits};
use proptest::prelude::*;
use serde_json::{Value, json};

fn respond(request: &str) -> String {
    let bytes = handle(request.as_bytes(), &Limits::default(), OutputFormat::Json, false).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn banker_textbook_state() {
    let response = respond(
        r#"{
            "mode": "BANKER",
            "banker": {
                "processes": 2,
                "resources": 1,
                "available": [1],
                "max": [[2], [1]],
                "allocation": [[1], [0]]
            }
        }"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "safe": true,
      "safeSequence": [
        "P0",
        "P1"
      ],
      "steps": [
        {
          "process": "P0",
          "workBefore": [
            1
          ],
          "workAfter": [
            2
          ]
        },
        {
          "process": "P1",
          "workBefore": [
            2
          ],
          "workAfter": [
            2
          ]
        }
      ],
      "blocked": []
    }
    "#);
}

#[test]
fn banker_mutual_dependency() {
    let response = respond(
        r#"{"mode":"BANKER","banker":{
            "available":[0,0],
            "maximum":[[1,1],[1,1]],
            "allocation":[[1,0],[0,1]]
        }}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "safe": false,
      "safeSequence": [],
      "steps": [],
      "blocked": [
        "P0",
        "P1"
      ]
    }
    "#);
}

#[test]
fn deadlock_three_cycle() {
    let response = respond(
        r#"{"mode":"DEADLOCK","deadlock":{"edges":[
            {"from":"A","to":"B"},{"from":"B","to":"C"},{"from":"C","to":"A"}
        ]}}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "deadlock": true,
      "cycle": [
        "A",
        "B",
        "C",
        "A"
      ]
    }
    "#);
}

#[test]
fn deadlock_chain_is_clear() {
    let response = respond(
        r#"{"mode":"DEADLOCK","deadlock":{"edges":[{"from":"A","to":"B"},{"from":"B","to":"C"}]}}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "deadlock": false,
      "cycle": []
    }
    "#);
}

#[test]
fn matrix_detection_waiting_then_executed() {
    let response = respond(
        r#"{"mode":"DEADLOCK_MATRIX","detection":{
            "available":[0],
            "allocation":[[0],[1]],
            "request":[[1],[0]]
        }}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "deadlock": false,
      "deadlockedProcesses": [],
      "steps": [
        {
          "process": "P0",
          "canRun": false,
          "action": "WAITING",
          "workBefore": [
            0
          ],
          "workAfter": [
            0
          ]
        },
        {
          "process": "P1",
          "canRun": true,
          "action": "EXECUTED",
          "workBefore": [
            0
          ],
          "workAfter": [
            1
          ]
        },
        {
          "process": "P0",
          "canRun": true,
          "action": "EXECUTED",
          "workBefore": [
            1
          ],
          "workAfter": [
            1
          ]
        }
      ]
    }
    "#);
}

#[test]
fn memory_single_frame_hit() {
    let response = respond(
        r#"{"mode":"MEMORY","memory":{"frames":1,"algorithm":"lru","references":[1,1]}}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "algorithm": "LRU",
      "frames": 1,
      "pageFaults": 1,
      "hits": 1,
      "hitRatio": 0.5,
      "steps": [
        {
          "page": 1,
          "status": "MISS",
          "frames": [
            1
          ]
        },
        {
          "page": 1,
          "status": "HIT",
          "frames": [
            1
          ]
        }
      ]
    }
    "#);
}

#[test]
fn memory_processes_tag_steps() {
    let response = respond(
        r#"{"mode":"MEMORY","memory":{"frames":1,"algorithm":"FIFO","processes":[
            {"pid":3,"pages":[5]},
            {"pid":4,"pages":[6]}
        ]}}"#,
    );

    insta::assert_snapshot!(response, @r#"
    {
      "algorithm": "FIFO",
      "frames": 1,
      "pageFaults": 2,
      "hits": 0,
      "hitRatio": 0.0,
      "steps": [
        {
          "page": 5,
          "status": "MISS",
          "frames": [
            5
          ],
          "process": 3
        },
        {
          "page": 6,
          "status": "MISS",
          "frames": [
            6
          ],
          "evicted": 5,
          "process": 4
        }
      ]
    }
    "#);
}

#[test]
fn identical_requests_give_identical_bytes() {
    let request = r#"{"mode":"MEMORY","memory":{"frames":3,"algorithm":"OPTIMAL",
        "references":[7,0,1,2,0,3,0,4,2,3,0,3,2,1,2,0,1,7,0,1]}}"#;

    assert_eq!(respond(request), respond(request));
}

#[test]
fn overflowing_banker_request_fails_cleanly() {
    let result = handle(
        br#"{"mode":"BANKER","banker":{
            "available":[9223372036854775807],"maximum":[[1]],"allocation":[[1]]
        }}"#,
        &Limits::default(),
        OutputFormat::Json,
        false,
    );

    assert!(matches!(result, Err(CliError::Input(InputError::ResourceOverflow { resource: 0 }))));
}

#[test]
fn overflowing_detection_request_fails_cleanly() {
    let result = handle(
        br#"{"mode":"DEADLOCK_MATRIX","detection":{
            "available":[9223372036854775807],"allocation":[[1]],"request":[[0]]
        }}"#,
        &Limits::default(),
        OutputFormat::Json,
        true,
    );

    assert!(matches!(result, Err(CliError::Input(InputError::ResourceOverflow { resource: 0 }))));
}

fn compact(request: &Value) -> Vec<u8> {
    let bytes = serde_json::to_vec(request).unwrap();
    handle(&bytes, &Limits::default(), OutputFormat::Json, true).unwrap()
}

/// Banker section with `allocation <= maximum` in every cell.
fn banker_section() -> impl Strategy<Value = Value> {
    (1usize..5, 1usize..4).prop_flat_map(|(processes, resources)| {
        (
            prop::collection::vec(0i64..6, resources),
            prop::collection::vec(prop::collection::vec((0i64..6, 0i64..6), resources), processes),
        )
            .prop_map(|(available, cells)| {
                let maximum: Vec<Vec<i64>> =
                    cells.iter().map(|row| row.iter().map(|&(a, b)| a.max(b)).collect()).collect();
                let allocation: Vec<Vec<i64>> =
                    cells.iter().map(|row| row.iter().map(|&(a, b)| a.min(b)).collect()).collect();
                json!({
                    "mode": "BANKER",
                    "banker": {
                        "available": available,
                        "maximum": maximum,
                        "allocation": allocation
                    }
                })
            })
    })
}

fn memory_section() -> impl Strategy<Value = Value> {
    let algorithm = prop::sample::select(vec!["FIFO", "LRU", "OPTIMAL"]);
    (1i64..5, algorithm, prop::collection::vec(0i64..8, 0..40)).prop_map(
        |(frames, algorithm, references)| {
            json!({
                "mode": "MEMORY",
                "memory": { "frames": frames, "algorithm": algorithm, "references": references }
            })
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_banker_response_is_stable_json(request in banker_section()) {
        let first = compact(&request);
        let second = compact(&request);
        prop_assert_eq!(&first, &second);

        // ORACLE: a safe answer names every process once, an unsafe one none
        let response: Value = serde_json::from_slice(&first).unwrap();
        let processes = request["banker"]["maximum"].as_array().unwrap().len();
        let sequence = response["safeSequence"].as_array().unwrap().len();
        let blocked = response["blocked"].as_array().unwrap().len();
        if response["safe"].as_bool().unwrap() {
            prop_assert_eq!(sequence, processes);
            prop_assert_eq!(blocked, 0);
        } else {
            prop_assert_eq!(sequence, 0);
            prop_assert!(blocked > 0);
        }
    }

    #[test]
    fn prop_memory_response_is_stable_json(request in memory_section()) {
        let first = compact(&request);
        let second = compact(&request);
        prop_assert_eq!(&first, &second);

        // ORACLE: one step per reference, each either a hit or a fault
        let response: Value = serde_json::from_slice(&first).unwrap();
        let references = request["memory"]["references"].as_array().unwrap().len();
        let hits = response["hits"].as_u64().unwrap();
        let faults = response["pageFaults"].as_u64().unwrap();
        prop_assert_eq!(response["steps"].as_array().unwrap().len(), references);
        prop_assert_eq!((hits + faults) as usize, references);
    }
}
