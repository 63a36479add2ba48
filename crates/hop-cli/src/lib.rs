pub mod runner;

pub use runner::{FrameTrace, ScenarioRunner};
