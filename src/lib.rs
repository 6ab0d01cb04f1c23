//! Attack and defense ratings for football teams, derived from historical results, and the
//! scoreline probabilities of a fixture under a Poisson model with the Dixon-Coles low-score
//! correction.

pub mod alias;
pub mod config;
pub mod csv;
pub mod domain;
pub mod error;
pub mod expectation;
pub mod file;
pub mod fixture;
pub mod manual;
pub mod market;
pub mod normalise;
pub mod poisson;
pub mod print;
pub mod probs;
pub mod rating;
pub mod scoregrid;
pub mod service;
pub mod source;
pub mod table;
pub mod timed;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
