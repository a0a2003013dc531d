pub mod domains;
pub mod entries;
pub mod matches;
pub mod rankings;
