//! Discovery providers.

pub mod docker;
