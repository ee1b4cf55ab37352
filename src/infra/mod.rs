//! Frontmatter handling and file name helpers

mod frontmatter;
mod slug;

pub use frontmatter::{frontmatter_title, split_frontmatter, strip_frontmatter};
pub use slug::attachment_name;
