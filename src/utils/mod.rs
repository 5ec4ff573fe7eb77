pub mod hasher;
pub mod numbers;
