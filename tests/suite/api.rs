//! Route-level behavior of the control API.

use serde_json::{Value, json};

use crate::common::{TestServer, level};

const SNAPSHOT_KEYS: [&str; 13] = [
    "time",
    "tanks",
    "ca_mass",
    "pressure_bar_abs",
    "pressure_bar_g",
    "running",
    "speed_factor",
    "co2_flow_m3_h",
    "co2_flow_kg_h",
    "off_gas_temp_C",
    "humidity_pct",
    "heat_kJ_cum",
    "devices",
];

async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("error body is JSON");
    body["error"].as_str().expect("error field").to_string()
}

#[tokio::test]
async fn state_reports_fresh_plant() {
    let server = TestServer::spawn().await;
    let state = server.state().await;

    let object = state.as_object().expect("snapshot object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = SNAPSHOT_KEYS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    let names: Vec<&str> = state["tanks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tank| tank["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["T-01", "M-01", "R-01"]);

    assert_eq!(state["time"], 0.0);
    assert_eq!(state["running"], false);
    assert_eq!(state["pressure_bar_abs"], 1.0);
    assert_eq!(state["ca_mass"], 500.0);
    assert_eq!(level(&state, "R-01"), 5.0);
    assert_eq!(level(&state, "M-01"), 0.0);
    assert_eq!(
        state["devices"],
        json!({"pump_a": false, "pump_b": false, "valve": false, "agitator": false})
    );
    for key in ["name", "volume_m3", "level_m3", "temperature_K", "concentration_wt"] {
        assert!(state["tanks"][0].get(key).is_some(), "tank key {key} missing");
    }
}

#[tokio::test]
async fn start_and_pause_toggle_running() {
    let server = TestServer::spawn().await;

    let response = server.post("/api/start").await;
    assert_eq!(response.status(), 204);
    assert_eq!(server.state().await["running"], true);

    // Starting twice is harmless.
    assert_eq!(server.post("/api/start").await.status(), 204);

    let response = server.post("/api/pause").await;
    assert_eq!(response.status(), 204);
    assert_eq!(server.state().await["running"], false);

    assert_eq!(server.post("/api/pause").await.status(), 204);
}

#[tokio::test]
async fn reset_restores_initial_state() {
    let server = TestServer::spawn().await;
    server
        .post_json("/api/device", &json!({"device": "valve", "on": true}))
        .await;
    server
        .post_json("/api/speed", &json!({"factor": 7.5}))
        .await;

    let response = server.post("/api/reset").await;
    assert_eq!(response.status(), 204);

    let state = server.state().await;
    assert_eq!(state["time"], 0.0);
    assert_eq!(state["speed_factor"], 1.0);
    assert_eq!(state["devices"]["valve"], false);
}

#[tokio::test]
async fn speed_is_clamped() {
    let server = TestServer::spawn().await;

    let response = server
        .post_json("/api/speed", &json!({"factor": 2.5}))
        .await;
    assert_eq!(response.status(), 204);
    assert_eq!(server.state().await["speed_factor"], 2.5);

    server
        .post_json("/api/speed", &json!({"factor": 150}))
        .await;
    assert_eq!(server.state().await["speed_factor"], 100.0);

    server
        .post_json("/api/speed", &json!({"factor": -5}))
        .await;
    assert_eq!(server.state().await["speed_factor"], 0.0);
}

#[tokio::test]
async fn speed_rejects_bad_bodies() {
    let server = TestServer::spawn().await;
    server
        .post_json("/api/speed", &json!({"factor": 3.0}))
        .await;

    for body in [json!({}), json!({"factor": "fast"}), json!({"factor": null})] {
        let response = server.post_json("/api/speed", &body).await;
        assert_eq!(response.status(), 400, "body {body}");
        let message = error_message(response).await;
        assert!(message.starts_with("invalid request"), "{message}");
    }

    let response = server
        .client
        .post(server.url("/api/speed"))
        .header("content-type", "application/json")
        .body("{factor: 2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Missing content type is a validation failure too.
    let response = server
        .client
        .post(server.url("/api/speed"))
        .body(r#"{"factor": 2.0}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(server.state().await["speed_factor"], 3.0);
}

#[tokio::test]
async fn device_switches_known_ids() {
    let server = TestServer::spawn().await;

    let response = server
        .post_json("/api/device", &json!({"device": "pump_b", "on": true}))
        .await;
    assert_eq!(response.status(), 204);
    assert_eq!(server.state().await["devices"]["pump_b"], true);

    server
        .post_json("/api/device", &json!({"device": "AGITATOR", "on": true}))
        .await;
    server
        .post_json("/api/device", &json!({"device": "pump_b", "on": false}))
        .await;
    let devices = server.state().await["devices"].clone();
    assert_eq!(
        devices,
        json!({"pump_a": false, "pump_b": false, "valve": false, "agitator": true})
    );
}

#[tokio::test]
async fn device_rejects_unknown_id() {
    let server = TestServer::spawn().await;
    let before = server.state().await;

    let response = server
        .post_json("/api/device", &json!({"device": "bogus", "on": true}))
        .await;
    assert_eq!(response.status(), 400);
    let body = response.text().await.unwrap();
    insta::assert_snapshot!(body, @r#"{"error":"unknown device: bogus"}"#);

    assert_eq!(server.state().await, before);
}

#[tokio::test]
async fn device_rejects_malformed_body() {
    let server = TestServer::spawn().await;

    for body in [
        json!({"device": "pump_a"}),
        json!({"device": "pump_a", "on": "yes"}),
        json!({"on": true}),
    ] {
        let response = server.post_json("/api/device", &body).await;
        assert_eq!(response.status(), 400, "body {body}");
        assert!(error_message(response).await.starts_with("invalid request"));
    }
    assert_eq!(server.state().await["devices"]["pump_a"], false);
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let response = server.get("/health").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let server = TestServer::spawn().await;
    assert_eq!(server.get("/api/nope").await.status(), 404);
    assert_eq!(server.get("/api/start").await.status(), 405);
}
