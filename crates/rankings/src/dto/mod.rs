pub mod common;
pub mod domain;
pub mod entry;
pub mod matches;
pub mod ranking;
