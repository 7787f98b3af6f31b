//! # Write-It Shared
//!
//! Wire types shared between the server and its clients: the uniform
//! response envelope and the request/response payloads.

pub mod dto;
pub mod response;

pub use response::Envelope;
