// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    GenerateOptions, GeneratedFiles, base_url_expression, expand_path, hint_for, load_snapshot,
};
