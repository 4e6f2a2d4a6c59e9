pub mod lead;
pub mod snippet;
