//! Employee records and report design backend.
//!
//! The crate is laid out as a hexagon: [`domain`] holds entities, ports and
//! services; [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements the driven ports over PostgreSQL, memory, bundled assets and
//! the PDF renderer.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
