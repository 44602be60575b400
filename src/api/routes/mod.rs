pub mod meta;
pub mod schedule;
