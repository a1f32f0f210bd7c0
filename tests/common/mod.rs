//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use acidsim_config::SimulationConfig;
use acidsim_engine::Simulation;

/// The real router bound to an ephemeral localhost port.
pub struct TestServer {
    base_url: String,
    pub sim: Simulation,
    pub client: reqwest::Client,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(&SimulationConfig::default(), true).await
    }

    pub async fn spawn_with(config: &SimulationConfig, cors: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");
        let sim = Simulation::new(config);
        let app = acidsim::router(sim.clone(), cors);
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self {
            base_url: format!("http://{addr}"),
            sim,
            client: reqwest::Client::new(),
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("POST request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request")
    }

    /// `GET /api/state` decoded as JSON.
    pub async fn state(&self) -> Value {
        let response = self.get("/api/state").await;
        assert_eq!(response.status(), 200);
        response.json().await.expect("snapshot JSON")
    }

    /// Poll the snapshot until `done` holds or `timeout` elapses.
    pub async fn wait_for(&self, timeout: Duration, done: impl Fn(&Value) -> bool) -> Value {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let state = self.state().await;
            if done(&state) {
                return state;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "condition not reached within {timeout:?}; last state: {state}"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.sim.shutdown();
        self.task.abort();
    }
}

/// A fast configuration: 10 simulated seconds per tick, ten ticks per second.
pub fn fast_config() -> SimulationConfig {
    toml::from_str("timestep_s = 10.0\nspeed = 100.0\n").expect("valid simulation config")
}

pub fn tank<'a>(state: &'a Value, name: &str) -> &'a Value {
    state["tanks"]
        .as_array()
        .expect("tanks array")
        .iter()
        .find(|tank| tank["name"] == name)
        .unwrap_or_else(|| panic!("tank {name} missing from {state}"))
}

pub fn level(state: &Value, name: &str) -> f64 {
    tank(state, name)["level_m3"].as_f64().expect("level_m3")
}
