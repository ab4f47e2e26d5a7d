pub mod ai;
pub mod engine;
pub mod narrator;
pub mod resolver;
pub mod state;

#[cfg(test)]
mod tests;
