//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod event_repo;
pub mod interaction_repo;
pub mod job_repo;
pub mod notification_repo;
pub mod review_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use event_repo::EventRepo;
pub use interaction_repo::InteractionRepo;
pub use job_repo::JobRepo;
pub use notification_repo::NotificationRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
