//! Evidence producers that need no network access.

pub mod age;
pub mod company;
pub mod heuristics;
pub(crate) mod rules;

#[cfg(test)]
mod tests;

pub use age::{age_signal, parse_posted_date};
pub use company::CompanyAnalyzer;
pub use heuristics::HeuristicAnalyzer;
