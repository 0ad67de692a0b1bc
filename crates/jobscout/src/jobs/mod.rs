pub mod feed;
pub mod model;
pub mod normalize;
pub mod repo;

pub use feed::{FeedError, JobFeed};
pub use model::{Job, StoredJob};
pub use normalize::normalize;
pub use repo::JobsRepo;
