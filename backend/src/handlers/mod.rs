//! API handlers

pub mod applications;
pub mod health;
pub mod quote;

pub use applications::*;
pub use health::health_check;
pub use quote::*;
