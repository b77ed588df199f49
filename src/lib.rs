
mod run;
mod config;
mod error;
mod hebrew;
mod similarity;
mod suggester;
pub mod candidates;
pub mod divisions;
pub mod titles;

pub use run::Run;
pub use config::{files_handling, Cli, SuggesterParams, VectorFormat};
pub use error::{Result, SuggesterError};
pub use similarity::WordVectors;
pub use suggester::{is_shuffle_of, Measure, Suggester};
