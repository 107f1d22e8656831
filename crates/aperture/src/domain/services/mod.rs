//! Domain Services
//!
//! Pure functions over domain entities: authority checks, search
//! shortcut detection and system prompt rendering.

pub mod authz;
pub mod prompt;
pub mod shortcut;

pub use authz::{check_multiple_authorities, has_authority, require_authority};
pub use prompt::render_system_prompt;
pub use shortcut::{clean_query, is_search_request};
