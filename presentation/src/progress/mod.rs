//! Progress reporting while matches run

pub mod reporter;
