mod provider;

pub mod completion;
pub mod config;
pub mod credential;
pub mod model;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod test_utils;

pub use crate::provider::llm::get_completion_llm;
