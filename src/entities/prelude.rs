pub use super::comments::Entity as Comments;
pub use super::likes::Entity as Likes;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
pub use super::videos::Entity as Videos;
