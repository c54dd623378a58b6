//! Cover and detail resolution plus the batch driver that applies them.

pub mod batch_runner;
pub mod cover_matcher;
pub mod detail_matcher;
