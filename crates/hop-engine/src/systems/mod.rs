pub mod carry;
pub mod debug;
pub mod integrator;
pub mod motion;
pub mod platform;
pub mod probe;
pub mod visuals;
