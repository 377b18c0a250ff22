use crate::models::{ChildPolicy, RuleSet};
use crate::parser::{parse_markup, ParseFailure};
use roxmltree::Node;
use std::collections::HashSet;

/// Longest slice of offending text quoted in a violation message.
const TEXT_PREVIEW_LEN: usize = 20;

/// Structural validator for rich text documents.
///
/// Walks the parsed tree and reports every grammar violation it finds as a
/// human-readable message. It never rewrites the input; an empty result
/// means the document is valid.
pub struct RichTextValidator {
    rules: RuleSet,
}

/// Accumulates violation messages for one validation call, dropping exact
/// duplicates so repeated identical subtrees report each problem once.
struct ErrorSink {
    seen: HashSet<String>,
    errors: Vec<String>,
}

impl ErrorSink {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            errors: Vec::new(),
        }
    }

    fn push(&mut self, message: String) {
        if self.seen.insert(message.clone()) {
            self.errors.push(message);
        }
    }

    fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

impl RichTextValidator {
    /// Create a validator over a rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Validate markup that may be absent entirely.
    ///
    /// Absent input is its own terminating error, distinct from a present
    /// but whitespace-only string.
    pub fn validate_opt(&self, markup: Option<&str>) -> Vec<String> {
        match markup {
            Some(markup) => self.validate(markup),
            None => vec![ParseFailure::Missing.to_string()],
        }
    }

    /// Validate a markup string against the grammar.
    ///
    /// Returns the accumulated violation messages, or an empty list when
    /// the document is valid. Terminating failures (whitespace-only input,
    /// a parse error, a missing or misnamed root) produce exactly one
    /// message and no structural checks run.
    pub fn validate(&self, markup: &str) -> Vec<String> {
        let document = match parse_markup(markup) {
            Ok(document) => document,
            Err(failure) => return vec![failure.to_string()],
        };

        let root = document.root_element();
        let root_tag = root.tag_name().name();
        if root_tag != "body" {
            return vec![ParseFailure::WrongRoot(root_tag.to_string()).to_string()];
        }

        let mut sink = ErrorSink::new();
        self.validate_node(root, "", &mut sink);
        sink.into_errors()
    }

    /// Validate one element and recurse into its children.
    ///
    /// `lineage` is the breadcrumb path to this node's parent; an unknown
    /// tag is located at its parent's path, everything else at its own.
    fn validate_node(&self, node: Node, lineage: &str, sink: &mut ErrorSink) {
        let tag = node.tag_name().name();

        // An unknown tag prunes its whole subtree: nested violations inside
        // foreign content would only add noise.
        if !self.rules.is_allowed_tag(tag) {
            sink.push(format!("Unsupported tag found: <{tag}> at {lineage}"));
            return;
        }

        let current = if lineage.is_empty() {
            tag.to_string()
        } else {
            format!("{lineage} > {tag}")
        };

        self.check_attributes(node, tag, &current, sink);

        if self.rules.must_be_empty(tag) {
            let has_content = node
                .children()
                .any(|child| child.is_element() || is_non_whitespace_text(child));
            if has_content {
                sink.push(format!(
                    "Tag <{tag}> must be empty but contains content at {current}"
                ));
            }
        }

        self.check_required_parent(node, tag, &current, sink);

        let policy = self.rules.child_policy(tag);
        for child in node.children() {
            if child.is_element() {
                let child_tag = child.tag_name().name();
                if let ChildPolicy::Restricted(allowed) = policy {
                    // Only report misplaced tags the grammar knows about; an
                    // unknown child gets its single "Unsupported tag" report
                    // from the recursive call instead.
                    if !allowed.contains(child_tag) && self.rules.is_allowed_tag(child_tag) {
                        sink.push(format!(
                            "Tag <{child_tag}> is not allowed as a direct child of <{tag}> at {current}"
                        ));
                    }
                }
                // A disallowed child is still validated on its own; only an
                // unknown tag prunes.
                self.validate_node(child, &current, sink);
            } else if is_non_whitespace_text(child) && !self.rules.allows_direct_text(tag) {
                let text = child.text().unwrap_or_default().trim();
                let preview: String = text.chars().take(TEXT_PREVIEW_LEN).collect();
                sink.push(format!(
                    "Text content (\"{preview}...\") found directly inside <{tag}> at {current}, which is not allowed."
                ));
            }
        }
    }

    fn check_attributes(&self, node: Node, tag: &str, current: &str, sink: &mut ErrorSink) {
        for attribute in node.attributes() {
            let name = attribute.name();
            let context = format!("on tag <{tag}> at {current}");

            if !self.rules.allows_attributes(tag) {
                sink.push(format!(
                    "Tag <{tag}> does not support attributes, but found '{name}' {context}"
                ));
                continue;
            }

            if !self.rules.attribute_allowed(tag, name) {
                sink.push(format!("Unsupported attribute '{name}' found {context}"));
            }

            // Name legality and value validity are independent checks: an
            // empty href is reported even though href itself is allowed.
            if name == "href" && attribute.value().is_empty() {
                sink.push(format!("Attribute 'href' cannot be empty {context}"));
            }
        }
    }

    fn check_required_parent(&self, node: Node, tag: &str, current: &str, sink: &mut ErrorSink) {
        let Some(required) = self.rules.required_parents_of(tag) else {
            return;
        };

        let parent_tag = node.parent_element().map(|p| p.tag_name().name().to_string());
        let satisfied = parent_tag
            .as_deref()
            .is_some_and(|parent| required.contains(parent));
        if !satisfied {
            let expected = required
                .iter()
                .map(|parent| format!("<{parent}>"))
                .collect::<Vec<_>>()
                .join(" or ");
            let actual = match parent_tag {
                Some(parent) => format!("<{parent}>"),
                None => "document root".to_string(),
            };
            sink.push(format!(
                "Tag <{tag}> at {current} must be a direct child of {expected}, but its parent is {actual}."
            ));
        }
    }
}

impl Default for RichTextValidator {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

fn is_non_whitespace_text(node: Node) -> bool {
    node.is_text() && node.text().is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(markup: &str) -> Vec<String> {
        RichTextValidator::default().validate(markup)
    }

    #[test]
    fn test_empty_body_is_valid() {
        assert!(validate("<body></body>").is_empty());
    }

    #[test]
    fn test_typical_document_is_valid() {
        let markup = r#"<body>
            <h1>Release notes</h1>
            Plain text with <strong>bold <em>nested</em></strong> words.
            <ul>
                <li>First <a href="https://example.com">link</a></li>
                <li>Second</li>
            </ul>
            <hr/>
            <table>
                <tr><td width="120">cell</td></tr>
            </table>
        </body>"#;
        assert_eq!(validate(markup), Vec::<String>::new());
    }

    #[test]
    fn test_missing_input() {
        let errors = RichTextValidator::default().validate_opt(None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("missing"));
    }

    #[test]
    fn test_whitespace_only_input() {
        let errors = validate("   \n  ");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("whitespace"));
    }

    #[test]
    fn test_malformed_markup_is_a_single_hard_stop() {
        let errors = validate("<body><li>unclosed</body>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not well-formed"));
    }

    #[test]
    fn test_root_must_be_body() {
        let errors = validate("<html><li>x</li></html>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Root element must be <body>"));
        assert!(errors[0].contains("<html>"));
    }

    #[test]
    fn test_root_check_is_case_sensitive() {
        let errors = validate("<BODY></BODY>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("found <BODY>"));
    }

    #[test]
    fn test_unsupported_tag_prunes_subtree() {
        // The stray <li> inside <script> must not surface its own
        // missing-parent violation.
        let errors = validate("<body><script><li>x</li></script></body>");
        assert_eq!(errors, vec!["Unsupported tag found: <script> at body".to_string()]);
    }

    #[test]
    fn test_disallowed_child_is_still_validated() {
        // <li> under <body> is a known tag in the wrong place: both the
        // placement error and its own required-parent violation surface.
        let errors = validate("<body><li>x</li></body>");
        assert!(errors
            .iter()
            .any(|e| e.contains("not allowed as a direct child of <body>")));
        assert!(errors
            .iter()
            .any(|e| e.contains("must be a direct child of <ol> or <ul>")
                && e.contains("its parent is <body>")));
    }

    #[test]
    fn test_identical_violations_are_deduplicated() {
        let errors = validate("<body><li>x</li><li>y</li></body>");
        let placement = errors
            .iter()
            .filter(|e| e.contains("not allowed as a direct child"))
            .count();
        let parentage = errors
            .iter()
            .filter(|e| e.contains("must be a direct child"))
            .count();
        assert_eq!(placement, 1);
        assert_eq!(parentage, 1);
    }

    #[test]
    fn test_attributes_forbidden_on_plain_tags() {
        let errors = validate(r#"<body><strong class="x" id="y">text</strong></body>"#);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.contains("<strong> does not support attributes")));
        assert!(errors.iter().any(|e| e.contains("'class'")));
        assert!(errors.iter().any(|e| e.contains("'id'")));
    }

    #[test]
    fn test_unsupported_attribute_name() {
        let errors = validate(r#"<body><a href="https://example.com" target="_blank">x</a></body>"#);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Unsupported attribute 'target'"));
    }

    #[test]
    fn test_empty_href_is_its_own_error() {
        let errors = validate(r#"<body><a href="">x</a></body>"#);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Attribute 'href' cannot be empty"));

        assert!(validate(r#"<body><a href="https://example.com">x</a></body>"#).is_empty());
    }

    #[test]
    fn test_empty_tag_must_stay_empty() {
        let errors = validate("<body><hr>content</hr></body>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("<hr> must be empty but contains content"));

        assert!(validate("<body><hr/></body>").is_empty());
    }

    #[test]
    fn test_empty_tag_with_element_child() {
        let errors = validate(r#"<body><img src="x.png"><strong>no</strong></img></body>"#);
        assert!(errors
            .iter()
            .any(|e| e.contains("<img> must be empty")));
    }

    #[test]
    fn test_required_parent_violation_names_both_sides() {
        let errors = validate("<body><table><td>cell</td></table></body>");
        assert!(errors.iter().any(|e| e.contains(
            "Tag <td> at body > table > td must be a direct child of <tr>, but its parent is <table>."
        )));
    }

    #[test]
    fn test_direct_text_forbidden_in_list_containers() {
        let errors = validate("<body><ul>stray text here<li>x</li></ul></body>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Text content (\"stray text here...\")"));
        assert!(errors[0].contains("directly inside <ul>"));
    }

    #[test]
    fn test_text_preview_is_truncated() {
        let long = "a".repeat(50);
        let errors = validate(&format!("<body><ol>{long}<li>x</li></ol></body>"));
        assert_eq!(errors.len(), 1);
        let expected_preview = format!("(\"{}...\")", "a".repeat(20));
        assert!(errors[0].contains(&expected_preview));
    }

    #[test]
    fn test_whitespace_between_list_items_is_ignored() {
        let errors = validate("<body><ul>\n  <li>x</li>\n</ul></body>");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_text_only_tags_accept_text_but_not_elements() {
        assert!(validate("<body><code>let x = 1;</code></body>").is_empty());

        let errors = validate("<body><code><strong>x</strong></code></body>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("<strong> is not allowed as a direct child of <code>"));
    }

    #[test]
    fn test_lineage_in_nested_violation() {
        let errors = validate("<body><blockquote><ul><li><img src=\"x\"/><hr/></li></ul></blockquote></body>");
        // img and hr are not allowed inside li.
        assert!(errors.iter().any(|e| e.contains(
            "not allowed as a direct child of <li> at body > blockquote > ul > li"
        )));
    }

    #[test]
    fn test_validation_is_idempotent_and_order_stable() {
        let markup = r#"<body><li>x</li><script>y</script><a href="">z</a></body>"#;
        let validator = RichTextValidator::default();
        let first = validator.validate(markup);
        let second = validator.validate(markup);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_traversal_continues_past_violations() {
        // Two independent problems in separate subtrees both surface.
        let markup = r#"<body><ul>text<li>x</li></ul><a href="">y</a></body>"#;
        let errors = validate(markup);
        assert!(errors.iter().any(|e| e.contains("directly inside <ul>")));
        assert!(errors.iter().any(|e| e.contains("'href' cannot be empty")));
    }
}
