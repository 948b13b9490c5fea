pub mod file;
pub mod traits;

// Re-export
pub use file::FileOrderRepository;
pub use traits::{OrderRepository, RoleDirectory};
