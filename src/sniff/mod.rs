//! Delimiter detection by table uniformity.
//!
//! Every candidate dialect parses the sample; the one producing the most
//! uniform table (consistent field counts across rows) wins, with tie-breaks
//! that favour common delimiters and the standard double quote.

pub mod candidates;
pub mod score;
pub mod table;
