//! Background tasks module
//!
//! This module contains the tasks that run alongside the quiz session.

pub mod countdown;

// Re-export main types
pub use countdown::CountdownClock;
