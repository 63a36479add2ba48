pub mod collaborators;
pub mod hooks;
pub mod simulation;
pub mod types;
