//! Diff size management: keeps what is sent to the model inside a token budget.

pub mod filter;
pub mod model;
pub mod packer;

pub use filter::{filter_and_truncate, is_binary_path};
pub use model::select_model;
pub use packer::{make_chunks, serialize_file, serialize_files, should_chunk};
