//! Fare Module
//!
//! Computes the parking fare of a closed ticket from its entry and exit
//! times, the spot category and the recurring-customer flag.

mod calculator;
mod rates;

pub use calculator::*;
pub use rates::*;
