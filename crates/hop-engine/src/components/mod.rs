pub mod appearance;
pub mod body;
pub mod config;
pub mod object;
pub mod state;
