
#[cfg(test)]
pub use test_utils::*;
