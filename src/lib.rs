// Library modules for trackshelf
// The binary and the tests both go through these

pub mod artwork;
pub mod backfill;
pub mod config;
pub mod models;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub mod test_utils;
