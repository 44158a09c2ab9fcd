pub mod phase;
pub mod sccp;

pub use phase::{run_pipeline, Phase};
pub use sccp::{SccpConfig, SccpError, SccpPass};
