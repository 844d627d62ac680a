//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-entity writes own their
//! transaction internally (see [`ProgressionRepo`]).

pub mod achievement_repo;
pub mod auth_session_repo;
pub mod level_progress_repo;
pub mod progression_repo;
pub mod session_repo;
pub mod user_repo;

pub use achievement_repo::AchievementRepo;
pub use auth_session_repo::AuthSessionRepo;
pub use level_progress_repo::LevelProgressRepo;
pub use progression_repo::ProgressionRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
