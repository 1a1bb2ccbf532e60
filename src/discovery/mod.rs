//! Depth-first directory traversal producing candidate file paths.
//!
//! The walker knows nothing about findings. It applies the directory
//! exclusion set, the optional stop-descent marker and the cancellation
//! token, and hands every regular file it reaches to the caller.

pub mod cancel;
pub mod filter;
pub mod walker;

pub use cancel::CancelToken;
pub use filter::{file_extension, FileFilter};
pub use walker::{
    validate_root, Candidate, CandidateOrigin, Diagnostic, StopDescent, Walk, WalkEvent,
    WalkOptions, WalkStats, Walker,
};
