//! Owned snapshot of a tab's DOM, taken through CDP with shadow roots and
//! same-process iframe documents pierced.
//!
//! The anti-bot widget lives behind nested encapsulation boundaries (shadow
//! root inside an iframe inside a shadow root), which page-side JavaScript
//! cannot cross when the roots are closed. A pierced `DOM.getDocument`
//! snapshot can, and converting it into a plain tree keeps the control search
//! pure and testable without a browser.

use std::collections::HashMap;

use headless_chrome::protocol::cdp::DOM;

/// Hidden-input name fragment identifying the challenge vendor's widget.
const CHALLENGE_INPUT_NAME: &str = "turnstile";

/// One element (or document) in the snapshot tree. `children` holds light-DOM
/// children, with an iframe's content document appended as an extra child;
/// `shadow_roots` holds the element's attached shadow trees.
#[derive(Debug, Clone)]
pub struct PageNode {
    pub node_id: u32,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<PageNode>,
    pub shadow_roots: Vec<PageNode>,
}

impl PageNode {
    pub fn new(tag: &str) -> Self {
        Self {
            node_id: 0,
            tag: tag.to_string(),
            attributes: HashMap::new(),
            children: Vec::new(),
            shadow_roots: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: PageNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_shadow_root(mut self, root: PageNode) -> Self {
        self.shadow_roots.push(root);
        self
    }

    /// Elements own at most one shadow root in practice; CDP reports a list.
    pub fn shadow_root(&self) -> Option<&PageNode> {
        self.shadow_roots.first()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Converts a CDP node tree into the snapshot form. Content documents of
    /// pierced iframes become ordinary children so tag searches descend into
    /// them transparently.
    pub fn from_cdp(node: &DOM::Node) -> Self {
        let tag = if node.local_name.is_empty() {
            node.node_name.to_lowercase()
        } else {
            node.local_name.clone()
        };

        let mut attributes = HashMap::new();
        if let Some(pairs) = &node.attributes {
            for pair in pairs.chunks_exact(2) {
                attributes.insert(pair[0].clone(), pair[1].clone());
            }
        }

        let mut children: Vec<PageNode> = node
            .children
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Self::from_cdp)
            .collect();
        if let Some(content) = node.content_document.as_ref() {
            children.push(Self::from_cdp(content));
        }

        let shadow_roots = node
            .shadow_roots
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Self::from_cdp)
            .collect();

        Self {
            node_id: node.node_id,
            tag,
            attributes,
            children,
            shadow_roots,
        }
    }
}

/// Recursive search across the shadow boundary: a node that carries a shadow
/// root exposes only that root (its light children are masked, mirroring the
/// platform's rendering rule); all other nodes are searched child by child in
/// document order. `visit` decides what, if anything, a shadow root yields.
pub fn search_shadow_hosts<'a>(
    node: &'a PageNode,
    visit: fn(&PageNode) -> Option<&PageNode>,
) -> Option<&'a PageNode> {
    if let Some(root) = node.shadow_root() {
        visit(root)
    } else {
        node.children
            .iter()
            .find_map(|child| search_shadow_hosts(child, visit))
    }
}

fn sole_iframe_child(shadow: &PageNode) -> Option<&PageNode> {
    shadow.children.first().filter(|child| child.tag == "iframe")
}

fn shadowed_input(shadow: &PageNode) -> Option<&PageNode> {
    find_by_tag(shadow, "input")
}

/// First descendant with the given tag, light DOM only (shadow roots are not
/// entered; pierced iframe documents are, since they sit in `children`).
pub fn find_by_tag<'a>(node: &'a PageNode, tag: &str) -> Option<&'a PageNode> {
    if node.tag == tag {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_by_tag(child, tag))
}

fn is_challenge_input(node: &PageNode) -> bool {
    node.tag == "input"
        && node
            .attr("name")
            .is_some_and(|name| name.contains(CHALLENGE_INPUT_NAME))
        && node.attr("type") == Some("hidden")
}

/// Parent of the vendor's hidden input, searched through light DOM.
fn find_challenge_input_parent(node: &PageNode) -> Option<&PageNode> {
    if node.children.iter().any(is_challenge_input) {
        return Some(node);
    }
    node.children.iter().find_map(find_challenge_input_parent)
}

/// Locates the clickable verification control, or `None` when the page shows
/// no recognizable widget.
///
/// Fast path: the widget's hidden `input[name*=turnstile][type=hidden]`
/// marks the host element; from its parent the control sits a fixed five
/// hops away (shadow root, first child, that element's `body`, its shadow
/// root, the `input` inside). Fallback for layout drift: recursively find
/// the first shadow root whose sole child is an iframe, then the first
/// shadow root inside that iframe's body containing an `input`.
pub fn locate_challenge_control(root: &PageNode) -> Option<&PageNode> {
    if let Some(control) = locate_via_hidden_input(root) {
        return Some(control);
    }
    log::warn!("challenge control fast path failed, searching recursively");
    locate_via_shadow_iframe(root)
}

fn locate_via_hidden_input(root: &PageNode) -> Option<&PageNode> {
    let host = find_challenge_input_parent(root)?;
    let widget = host.shadow_root()?.children.first()?;
    let body = find_by_tag(widget, "body")?;
    find_by_tag(body.shadow_root()?, "input")
}

fn locate_via_shadow_iframe(root: &PageNode) -> Option<&PageNode> {
    let body = find_by_tag(root, "body")?;
    let iframe = match search_shadow_hosts(body, sole_iframe_child) {
        Some(frame) => frame,
        None => {
            log::warn!("challenge iframe not found, control search failed");
            return None;
        }
    };
    let frame_body = find_by_tag(iframe, "body")?;
    search_shadow_hosts(frame_body, shadowed_input)
}
