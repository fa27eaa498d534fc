//! Fixture validators. Each returns one report per run, one or more results
//! per fixture.

pub mod round_trip;
pub mod turtle;
