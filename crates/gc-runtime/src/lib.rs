//! # GC Runtime
//!
//! Replays recorded invite-list sessions.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`GC_*` environment variables)
//! 2. Load configuration (TOML file, then environment overrides)
//! 3. Load the session fixture
//! 4. Replay steps, printing one JSON record per line
//! 5. Dump metrics to stderr (with the `metrics` feature)

pub mod driver;
pub mod session;

pub use driver::replay;
pub use session::{Session, SessionStep};
