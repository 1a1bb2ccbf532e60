pub mod csv;
pub mod formatter;

pub use csv::{sensitive_hits_to_csv, write_sensitive_csv};
pub use formatter::{JsonOutput, OutputFormatter};
