use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Child-element policy for a parent tag.
///
/// A tag with no entry in the child table accepts any allowed tag as a
/// direct child (`Open`). A tag with an entry only accepts the listed
/// tags, and an empty set means no element children at all.
#[derive(Debug, Clone, Copy)]
pub enum ChildPolicy<'a> {
    /// Any allowed tag may appear as a direct child.
    Open,
    /// Only the listed tags may appear as direct children.
    Restricted(&'a BTreeSet<String>),
}

/// The rich text grammar: which tags exist, which attributes they carry,
/// and how they may nest.
///
/// Built once at startup and never mutated; validation calls share it
/// read-only, so it is safe to use from multiple threads.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    /// Tags that may legally appear anywhere in a document.
    pub allowed_tags: BTreeSet<String>,
    /// Tags permitted to carry any attribute at all.
    pub tags_with_attributes: BTreeSet<String>,
    /// Attribute names legal on each tag in `tags_with_attributes`.
    pub allowed_attributes: BTreeMap<String, BTreeSet<String>>,
    /// Tags that must contain no element or non-whitespace text children.
    pub empty_tags: BTreeSet<String>,
    /// Direct child elements each parent may contain. A missing entry
    /// means any allowed tag is fine; an empty set means none.
    pub allowed_child_tags: BTreeMap<String, BTreeSet<String>>,
    /// Tags that must sit directly inside one of the listed parents.
    pub required_parents: BTreeMap<String, BTreeSet<String>>,
    /// Tags that may not contain non-whitespace text nodes directly.
    pub no_direct_text_tags: BTreeSet<String>,
}

fn tag_set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|t| (*t).to_string()).collect()
}

impl RuleSet {
    /// The grammar Asana accepts for formatted task, subtask, and comment
    /// bodies. Documents are rooted at `<body>`.
    pub fn asana_rich_text() -> Self {
        let mut allowed_attributes = BTreeMap::new();
        allowed_attributes.insert(
            "a".to_string(),
            tag_set(&[
                "href",
                "data-asana-gid",
                "data-asana-accessible",
                "data-asana-type",
                "data-asana-dynamic",
            ]),
        );
        allowed_attributes.insert(
            "img".to_string(),
            tag_set(&[
                "src",
                "data-asana-gid",
                "data-asana-type",
                "data-src-height",
                "data-src-width",
                "data-thumbnail-url",
                "data-thumbnail-height",
                "data-thumbnail-width",
                "alt",
                "style",
            ]),
        );
        allowed_attributes.insert("td".to_string(), tag_set(&["width", "data-cell-widths"]));

        let mut allowed_child_tags = BTreeMap::new();
        allowed_child_tags.insert(
            "body".to_string(),
            tag_set(&[
                "strong", "em", "u", "s", "a", "code", "pre", "blockquote", "ul", "ol", "h1",
                "h2", "table", "hr", "img",
            ]),
        );
        allowed_child_tags.insert("ul".to_string(), tag_set(&["li"]));
        allowed_child_tags.insert("ol".to_string(), tag_set(&["li"]));
        allowed_child_tags.insert(
            "li".to_string(),
            tag_set(&["strong", "em", "u", "s", "a", "code", "ul", "ol"]),
        );
        allowed_child_tags.insert(
            "blockquote".to_string(),
            tag_set(&["ul", "ol", "pre", "strong", "em", "u", "s", "a", "code"]),
        );
        // Text-only tags: text is fine, element children are not.
        allowed_child_tags.insert("pre".to_string(), BTreeSet::new());
        allowed_child_tags.insert("h1".to_string(), BTreeSet::new());
        allowed_child_tags.insert("h2".to_string(), BTreeSet::new());
        allowed_child_tags.insert("code".to_string(), BTreeSet::new());
        allowed_child_tags.insert("table".to_string(), tag_set(&["tr"]));
        allowed_child_tags.insert("tr".to_string(), tag_set(&["td"]));
        allowed_child_tags.insert(
            "td".to_string(),
            tag_set(&["strong", "em", "u", "s", "a", "code"]),
        );
        // Inline tags nest each other and may contain links and code.
        allowed_child_tags.insert(
            "strong".to_string(),
            tag_set(&["em", "u", "s", "a", "code", "strong"]),
        );
        allowed_child_tags.insert(
            "em".to_string(),
            tag_set(&["strong", "u", "s", "a", "code", "em"]),
        );
        allowed_child_tags.insert(
            "u".to_string(),
            tag_set(&["strong", "em", "s", "a", "code", "u"]),
        );
        allowed_child_tags.insert(
            "s".to_string(),
            tag_set(&["strong", "em", "u", "a", "code", "s"]),
        );
        allowed_child_tags.insert("a".to_string(), tag_set(&["strong", "em", "u", "s", "code"]));

        let mut required_parents = BTreeMap::new();
        required_parents.insert("li".to_string(), tag_set(&["ul", "ol"]));
        required_parents.insert("tr".to_string(), tag_set(&["table"]));
        required_parents.insert("td".to_string(), tag_set(&["tr"]));

        Self {
            allowed_tags: tag_set(&[
                "body",
                "strong",
                "em",
                "u",
                "s",
                "a",
                "code",
                "pre",
                "blockquote",
                "ul",
                "li",
                "ol",
                "h1",
                "h2",
                "table",
                "tr",
                "td",
                "hr",
                "img",
            ]),
            tags_with_attributes: tag_set(&["a", "img", "td"]),
            allowed_attributes,
            empty_tags: tag_set(&["hr", "img"]),
            allowed_child_tags,
            required_parents,
            no_direct_text_tags: tag_set(&["ul", "ol", "table", "tr"]),
        }
    }

    /// Check whether a tag may appear anywhere in a document.
    pub fn is_allowed_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Check whether a tag may carry attributes at all.
    pub fn allows_attributes(&self, tag: &str) -> bool {
        self.tags_with_attributes.contains(tag)
    }

    /// Check whether a specific attribute name is legal on a tag.
    pub fn attribute_allowed(&self, tag: &str, attribute: &str) -> bool {
        self.allowed_attributes
            .get(tag)
            .is_some_and(|attrs| attrs.contains(attribute))
    }

    /// Check whether a tag must contain no content.
    pub fn must_be_empty(&self, tag: &str) -> bool {
        self.empty_tags.contains(tag)
    }

    /// Parents a tag is required to sit directly inside, if constrained.
    pub fn required_parents_of(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.required_parents.get(tag)
    }

    /// The child-element policy for a parent tag.
    pub fn child_policy(&self, tag: &str) -> ChildPolicy<'_> {
        match self.allowed_child_tags.get(tag) {
            Some(allowed) => ChildPolicy::Restricted(allowed),
            None => ChildPolicy::Open,
        }
    }

    /// Check whether a tag may contain non-whitespace text directly.
    pub fn allows_direct_text(&self, tag: &str) -> bool {
        !self.no_direct_text_tags.contains(tag)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::asana_rich_text()
    }
}
