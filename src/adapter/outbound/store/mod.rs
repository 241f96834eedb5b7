//! File-backed local state.

mod seen_file;
mod trait_file;

pub use seen_file::FileSeenStore;
pub use trait_file::load_trait_rule;
