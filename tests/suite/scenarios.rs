//! End-to-end process runs driven through the API.

use std::time::Duration;

use serde_json::json;

use crate::common::{TestServer, fast_config, level};

const WAIT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn running_plant_transfers_acid_into_mixer() {
    let server = TestServer::spawn_with(&fast_config(), true).await;
    for device in ["pump_a", "valve"] {
        let response = server
            .post_json("/api/device", &json!({"device": device, "on": true}))
            .await;
        assert_eq!(response.status(), 204);
    }
    server.post("/api/start").await;

    let state = server
        .wait_for(WAIT, |state| state["time"].as_f64().unwrap() >= 50.0)
        .await;

    assert!(level(&state, "T-01") < 5.0);
    assert!(level(&state, "M-01") > 0.0);
    assert_eq!(level(&state, "R-01"), 5.0);
    let mixer_wt = state["tanks"][1]["concentration_wt"].as_f64().unwrap();
    assert!((0.0..98.0).contains(&mixer_wt), "mixer at {mixer_wt} wt-%");
    for tank in state["tanks"].as_array().unwrap() {
        let level = tank["level_m3"].as_f64().unwrap();
        let volume = tank["volume_m3"].as_f64().unwrap();
        assert!((0.0..=volume).contains(&level), "{tank}");
    }
}

#[tokio::test]
async fn feeding_the_reactor_releases_heat_and_co2() {
    let server = TestServer::spawn_with(&fast_config(), true).await;
    for device in ["pump_a", "pump_b", "valve", "agitator"] {
        server
            .post_json("/api/device", &json!({"device": device, "on": true}))
            .await;
    }
    server.post("/api/start").await;

    let state = server
        .wait_for(WAIT, |state| state["heat_kJ_cum"].as_f64().unwrap() > 0.0)
        .await;

    assert!(state["ca_mass"].as_f64().unwrap() < 500.0);
    assert!(state["pressure_bar_abs"].as_f64().unwrap() > 1.0);
    assert!(level(&state, "R-01") > 5.0);
}

#[tokio::test]
async fn pause_freezes_time_and_reset_rewinds_it() {
    let server = TestServer::spawn_with(&fast_config(), true).await;
    server.post("/api/start").await;
    server
        .wait_for(WAIT, |state| state["time"].as_f64().unwrap() >= 20.0)
        .await;

    server.post("/api/pause").await;
    let paused = server.state().await;
    assert_eq!(paused["running"], false);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(server.state().await["time"], paused["time"]);

    server.post("/api/reset").await;
    let state = server.state().await;
    assert_eq!(state["time"], 0.0);
    assert_eq!(state["running"], false);
}

#[tokio::test]
async fn reset_while_running_keeps_the_driver() {
    let server = TestServer::spawn_with(&fast_config(), true).await;
    server.post("/api/start").await;
    server
        .wait_for(WAIT, |state| state["time"].as_f64().unwrap() >= 30.0)
        .await;

    server.post("/api/reset").await;
    // Reset restores speed 1; speeding back up wakes the driver right away.
    server
        .post_json("/api/speed", &json!({"factor": 100}))
        .await;
    let state = server
        .wait_for(WAIT, |state| state["time"].as_f64().unwrap() > 0.0)
        .await;
    assert_eq!(state["running"], true);
    assert!(state["time"].as_f64().unwrap() <= 30.0);
}

#[tokio::test]
async fn speed_zero_parks_the_driver() {
    let server = TestServer::spawn_with(&fast_config(), true).await;
    server
        .post_json("/api/speed", &json!({"factor": 0}))
        .await;
    server.post("/api/start").await;

    // The first tick runs immediately, the next one is far away.
    let state = server
        .wait_for(WAIT, |state| state["time"].as_f64().unwrap() > 0.0)
        .await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(server.state().await["time"], state["time"]);
    assert_eq!(state["running"], true);
}
