pub mod binding;
pub mod synchronizer;
