//! Ports for the middleware core (hexagonal architecture)
//!
//! - `inbound`: the API this core exposes to its host
//! - `outbound`: the external collaborators this core depends on

pub mod inbound;
pub mod outbound;
