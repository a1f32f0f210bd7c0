//! HTTP control surface for the acid neutralization simulator.
//!
//! # Routes
//!
//! | method | path          | body                         | response            |
//! |--------|---------------|------------------------------|---------------------|
//! | GET    | `/api/state`  |                              | 200 snapshot JSON   |
//! | POST   | `/api/start`  |                              | 204                 |
//! | POST   | `/api/pause`  |                              | 204                 |
//! | POST   | `/api/reset`  |                              | 204                 |
//! | POST   | `/api/speed`  | `{"factor": 2.0}`            | 204, 400 on bad body |
//! | POST   | `/api/device` | `{"device": "pump_a", "on": true}` | 204, 400 on unknown id |
//! | GET    | `/health`     |                              | 200 `OK`            |
//!
//! Every 400 carries `{"error": "<message>"}` and leaves the simulation
//! untouched.

mod api;

pub use api::{ApiError, router};
