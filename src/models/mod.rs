//! Data models for LMS

pub mod book;
pub mod enums;
pub mod member;
pub mod submission;

// Re-export commonly used types
pub use book::{AvailableQuery, Book, BookFilter, CreateBook};
pub use enums::{Genre, Role};
pub use member::{CreateMember, Member, MemberFilter};
pub use submission::{Created, Submission};
