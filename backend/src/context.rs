use std::path::PathBuf;

use sqlgen_core::gateway::CompletionGateway;
use sqlgen_core::schema::SchemaStore;

/// Shared state handed to every request handler.
pub struct ServiceContext {
    pub schema: SchemaStore,
    pub gateway: CompletionGateway,
    pub static_dir: Option<PathBuf>,
}

impl ServiceContext {
    pub fn new(gateway: CompletionGateway, static_dir: Option<PathBuf>) -> Self {
        Self {
            schema: SchemaStore::default(),
            gateway,
            static_dir,
        }
    }
}
