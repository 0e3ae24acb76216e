//! Data source implementations.
//!
//! | Source | Implementation | Description |
//! |--------|----------------|-------------|
//! | `dremio` | `DremioDataSource` | Job-based SQL over REST: submit, poll, page through results |
//!
//! # Adding a New Source
//!
//! 1. Describe the remote calls as an async trait (see [`dremio::JobApi`]) so the
//!    orchestration can be tested against an in-memory implementation.
//! 2. Implement the trait over `reqwest` and keep it stateless apart from credentials.
//! 3. Convert results into a [`dremio::ResultFrame`].

pub mod dremio;
