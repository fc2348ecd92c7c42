pub mod matcher;
pub mod rewriter;
pub mod wildcard;

pub use matcher::{UrlMatcher, UrlMatcherPattern};
pub use rewriter::{rewrite_url, UrlTransform, MAX_TRANSFORM_DEPTH};
pub use wildcard::WildcardPattern;
