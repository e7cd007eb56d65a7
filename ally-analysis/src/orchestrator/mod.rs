//! Scan orchestration: state machine, custom-test bridge, pipeline.

pub mod custom;
pub mod orchestrator;
pub mod session;

pub use custom::{CustomTestBridge, CustomTestContributor, CustomTestReport};
pub use orchestrator::ScanOrchestrator;
pub use session::{ScanOutcome, ScanState};
