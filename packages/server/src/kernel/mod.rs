//! Kernel module - server infrastructure and dependencies.

pub mod apify_invoker;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use apify_invoker::ApifyScrapeInvoker;
pub use deps::ServerDeps;
pub use traits::*;
