//! Application layer: the game orchestrator and its settings.

pub mod orchestrator;
pub mod settings;

pub use orchestrator::{ForceStartOutcome, GameOrchestrator};
pub use settings::GameSettings;
