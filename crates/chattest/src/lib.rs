pub mod commands;
pub mod log;
pub mod ux;
pub mod web;

#[cfg(test)]
mod test_utils;
