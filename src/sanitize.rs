//! Cleaning of user-supplied markup.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};
use lazy_static::lazy_static;

lazy_static! {
    static ref STRIP_ALL: Builder<'static> = {
        let mut b = Builder::empty();
        b.clean_content_tags(HashSet::from(["script", "style"]));
        b
    };
    static ref BASIC: Builder<'static> = {
        let mut b = Builder::empty();
        b.tags(HashSet::from([
            "a", "b", "blockquote", "br", "cite", "code", "dd", "dl", "dt", "em", "i", "li",
            "ol", "p", "pre", "q", "small", "span", "strike", "strong", "sub", "sup", "u", "ul",
        ]))
        .tag_attributes(HashMap::from([
            ("a", HashSet::from(["href"])),
            ("blockquote", HashSet::from(["cite"])),
            ("q", HashSet::from(["cite"])),
        ]))
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .url_relative(UrlRelative::Deny)
        .link_rel(Some("nofollow"))
        .clean_content_tags(HashSet::from(["script", "style"]));
        b
    };
}

/// Removes every tag, keeping only text. Script and style bodies are dropped.
pub fn strip_all(input: &str) -> String {
    STRIP_ALL.clean(input).to_string()
}

/// Keeps simple inline and list formatting plus outbound links.
pub fn basic(input: &str) -> String {
    BASIC.clean(input).to_string()
}
