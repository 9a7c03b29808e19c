pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use groups::GroupRepository;
pub use posts::PostRepository;
pub use users::UserRepository;
