pub mod aggregator;
pub mod engine;
pub mod features;
pub mod normalizer;
pub mod types;
pub mod vocabulary;
