//! Stored entities: pages, their posts and employees, and post comments.

mod comment;
mod employee;
mod page;
mod post;
pub mod text;

pub use comment::Comment;
pub use employee::Employee;
pub use page::Page;
pub use post::Post;
