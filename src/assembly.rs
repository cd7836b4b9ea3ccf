//! Elementary assembly and scatter into the global system.
pub mod global;
pub mod local;
