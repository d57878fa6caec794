//! Platform-agnostic messaging abstractions (Discord today).

pub mod port;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;
