//! These models represent the objects exchanged with the assistants service.
//!
//! The remote side owns runs and threads; the local process only ever holds
//! opaque identifiers and the projections defined here. Tool descriptors and
//! outputs are produced locally and serialized onto the wire as-is.
pub mod message;
pub mod run;
pub mod tool;
