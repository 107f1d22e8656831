//! Built-in Agent Tools

pub mod global_search;
pub mod update_memory;

use std::sync::Arc;

use aperture::{CrmSearch, ToolRegistry};

pub use global_search::GlobalSearchTool;
pub use update_memory::UpdateMemoryTool;

/// Registry with every built-in tool, in the order they are offered to the model
pub fn builtin_registry(search: Arc<dyn CrmSearch>, search_limit: usize) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GlobalSearchTool::new(search, search_limit)));
    registry.register(Arc::new(UpdateMemoryTool));
    registry
}
