#![forbid(unsafe_code)]

pub mod distributor;
pub mod model;
pub mod overview;
pub mod scoring;
pub mod session;
pub mod time;

pub use time::Clock;
