/// Frame-stepping harness.
pub mod harness;
/// Deterministic host services.
pub mod host;

pub use harness::{Harness, HarnessBuilder, init_tracing};
pub use host::{MonoText, StaticTextures, test_host};
