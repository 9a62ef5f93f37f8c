pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;
