pub mod merge;
pub mod thread_safety;
