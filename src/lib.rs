//! # Course Scout
//!
//! A schema-tolerant query layer over a remote course catalog.
//!
//! Course Scout fetches a catalog listing once, normalizes its unstable JSON
//! record shapes into a common schema, caches the result with a freshness
//! window, and answers search, detail, and recommendation queries against
//! the cache — via a CLI and an MCP-compatible tool server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────┐   ┌───────────────┐
//! │ Catalog  │──▶│  Flatten +      │──▶│ Session cache  │
//! │ API      │   │  Normalize      │   │ (TTL index)   │
//! └──────────┘   └─────────────────┘   └──────┬────────┘
//!                                             │
//!                            ┌────────────────┤
//!                            ▼                ▼
//!                      ┌──────────┐     ┌──────────┐
//!                      │   CLI    │     │   HTTP   │
//!                      │ (cscout) │     │ (tools)  │
//!                      └──────────┘     └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cscout refresh                       # fetch and index the catalog
//! cscout search "laravel pemula"       # fuzzy search
//! cscout detail belajar-laravel        # one course, by slug or title
//! cscout serve                         # start the tool server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`flatten`] | Recursive JSON flattening |
//! | [`fields`] | Prioritized field lookup |
//! | [`normalize`] | Raw record → course normalization |
//! | [`fetch`] | Catalog fetch collaborator |
//! | [`cache`] | Session-scoped catalog cache |
//! | [`score`] | Fuzzy relevance scoring |
//! | [`ops`] | Search, detail, preference, and recommendation operations |
//! | [`tools`] | Tool trait and registry |
//! | [`server`] | Agent-facing HTTP server |

pub mod cache;
pub mod config;
pub mod fetch;
pub mod fields;
pub mod flatten;
pub mod models;
pub mod normalize;
pub mod ops;
pub mod score;
pub mod server;
pub mod tools;
