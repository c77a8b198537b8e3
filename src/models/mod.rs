mod attachment;
mod custom_field;
mod issue;
mod link;
mod user;

pub use attachment::Attachment;
pub use custom_field::CustomField;
pub use issue::{Issue, IssueFields, IssueId, Status, Version};
pub use link::{Link, LinkType, RemoteLink};
pub use user::User;
