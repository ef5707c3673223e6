//! Application use cases (business logic orchestration).

mod branches;
mod departments;
mod resource;

pub use branches::BranchService;
pub use departments::DepartmentService;
pub use resource::ResourceClient;
