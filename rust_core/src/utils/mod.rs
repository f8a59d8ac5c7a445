pub mod matching;
pub mod naming;
