//! Frame export hook: advance simulated time and hand each sample to a sink.

/// Sample fingerprints for static-frame elision.
pub mod fingerprint;
/// Sink contract and range export.
pub mod sink;
