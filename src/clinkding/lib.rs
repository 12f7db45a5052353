//! # clinkding Architecture
//!
//! clinkding is a command-line client for the [linkding](https://github.com/sissbruecker/linkding)
//! bookmark manager's REST API. It covers bookmarks, tags, bundles, assets and the user
//! profile, with human, JSON and plain (tab-separated) output.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts for confirmation               │
//! │  - The ONLY place that knows about exit codes               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Single facade over the gateways                          │
//! │  - Normalizes input (tag lists, tag merges, date filters)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Gateway Layer (gateway/*.rs)                               │
//! │  - One module per resource: paths and payload shapes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport (client.rs)                                      │
//! │  - Authenticated HTTP, streaming upload/download            │
//! │  - Status classification into typed errors (error.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results flow back up as model types (`model.rs`) and are rendered by the
//! [`output::Formatter`], the only library code that writes to stdout.
//!
//! ## Configuration
//!
//! A [`config::Config`] is resolved once per invocation from defaults, the YAML config
//! file, the environment and flags, then passed by reference. Nothing reads global
//! state after that point.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | request, decode, network, filesystem, validation or config error |
//! | 3 | authentication failed (HTTP 401/403) |
//! | 4 | resource not found (HTTP 404) |

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod output;
