pub mod prelude;

pub mod comments;
pub mod likes;
pub mod sessions;
pub mod users;
pub mod videos;
