pub mod candidates;
pub mod enumerator;
