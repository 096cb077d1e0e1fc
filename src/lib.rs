// Library root
// -----------
// Terminal front end for a remote face-recognition and tracking server.
// The binary (`main.rs`) only resolves configuration and mounts the app.
//
// Module responsibilities:
// - `api`: async wrappers around the server's HTTP endpoints. Payloads are
//   returned as opaque JSON.
// - `app`: bootstrap; wires the router, display filters and API client.
// - `config`: resolves the server base URL once at startup.
// - `error`: the `NetworkError` returned by every `api` call.
// - `filters`: named value formatters used when printing payloads.
// - `router`: path-to-view table with a navigation history.
// - `ui`: the interactive screens, delegating requests to `api`.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod router;
pub mod ui;

pub use api::ApiClient;
pub use config::Config;
pub use error::NetworkError;
