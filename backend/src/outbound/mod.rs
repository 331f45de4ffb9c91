//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for database-less runs and tests
//! - **assets**: bundled designs and logos read through `cap_std`
//! - **rendering**: band-layout design compiler and PDF writer
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod assets;
pub mod memory;
pub mod persistence;
pub mod rendering;
