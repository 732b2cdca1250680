//! Breadcrumb trails for studio navigation.
//!
//! Resolves a URL path into ordered `(label, href)` pairs, e.g.
//! - `/` -> Dashboard
//! - `/finance/purchase-order/PO123` -> Finance / purchase-order / PO-0099
//! - `/projects/p1/folders/f9` -> Projects / <project name> / folders / f9
//!
//! Resolution is a pure function of the path and whatever lookup data the
//! caller has loaded so far. Entities that are not loaded yet get a
//! placeholder label; the caller re-resolves once its lookups settle.

use serde::{Deserialize, Serialize};

pub const ROOT_LABEL: &str = "Dashboard";
pub const PROJECT_PENDING_LABEL: &str = "Loading…";
pub const ENTITY_PENDING_LABEL: &str = "Loading..";
pub const NEW_INVOICE_LABEL: &str = "Create Invoice";
const FOLDERS_SEGMENT: &str = "folders";

const TOP_LEVEL_LABELS: [(&str, &str); 8] = [
    ("home", "Home"),
    ("crm", "CRM"),
    ("projects", "Projects"),
    ("library", "Library"),
    ("calendar", "Calendar"),
    ("finance", "Finance"),
    ("reports", "Reports"),
    ("settings", "Settings"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

impl Breadcrumb {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderRef {
    pub id: String,
    #[serde(alias = "poNumber")]
    pub po_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRef {
    pub id: String,
    #[serde(alias = "inNumber")]
    pub in_number: String,
}

/// Lookup results the caller has resolved so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbLookups {
    /// Project names resolved so far; an id missing here is still pending.
    #[serde(default)]
    pub projects: Vec<ProjectRef>,
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default, alias = "purchaseOrders")]
    pub purchase_orders: Vec<PurchaseOrderRef>,
    #[serde(default)]
    pub invoices: Vec<InvoiceRef>,
}

impl BreadcrumbLookups {
    pub fn with_project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.set_project_name(id, name);
        self
    }

    /// Record the name for project `id`, replacing any earlier one.
    pub fn set_project_name(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        self.projects.retain(|project| project.id != id);
        self.projects.push(ProjectRef {
            id,
            name: name.into(),
        });
    }

    fn project_name(&self, id: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|project| project.id == id)
            .map(|project| project.name.as_str())
    }

    fn user_name(&self, id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .map(|user| user.name.as_str())
    }

    fn po_number(&self, id: &str) -> Option<&str> {
        self.purchase_orders
            .iter()
            .find(|po| po.id == id)
            .map(|po| po.po_number.as_str())
    }

    fn invoice_number(&self, id: &str) -> Option<&str> {
        self.invoices
            .iter()
            .find(|invoice| invoice.id == id)
            .map(|invoice| invoice.in_number.as_str())
    }
}

/// Split a URL path into its non-empty segments. Query strings and
/// fragments are dropped.
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

pub fn resolve(path: &str, lookups: &BreadcrumbLookups) -> Vec<Breadcrumb> {
    resolve_segments(&split_path(path), lookups)
}

pub fn resolve_segments(segments: &[&str], lookups: &BreadcrumbLookups) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| !segment.is_empty())
        .collect();

    let Some(&first) = segments.first() else {
        return vec![Breadcrumb::new(ROOT_LABEL, "/")];
    };

    let mut trail = Vec::with_capacity(segments.len());
    let top_label = TOP_LEVEL_LABELS
        .iter()
        .find(|(key, _)| *key == first)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| decode_segment(first));
    trail.push(Breadcrumb::new(top_label, segment_href(&segments, 0)));

    let mut start = 1;
    if first == "projects" && segments.len() > 1 {
        let project_id = segments[1];
        let label = lookups
            .project_name(project_id)
            .unwrap_or(PROJECT_PENDING_LABEL)
            .to_string();
        trail.push(Breadcrumb::new(label, format!("/projects/{project_id}")));
        start = 2;
    }

    for (index, segment) in segments.iter().enumerate().skip(start) {
        let decoded = decode_segment(segment);
        let label = if index == 2 {
            entity_label(first, segments[1], &decoded, lookups).unwrap_or(decoded)
        } else {
            decoded
        };
        trail.push(Breadcrumb::new(label, segment_href(&segments, index)));
    }

    trail
}

/// Title-case a label for display: first character upper-cased, rest kept.
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn entity_label(
    section: &str,
    kind: &str,
    id: &str,
    lookups: &BreadcrumbLookups,
) -> Option<String> {
    let label = match (section, kind) {
        ("reports", "productivity") => lookups.user_name(id).unwrap_or(ENTITY_PENDING_LABEL),
        ("finance", "purchase-order") => lookups.po_number(id).unwrap_or(ENTITY_PENDING_LABEL),
        ("finance", "invoices") => lookups.invoice_number(id).unwrap_or(NEW_INVOICE_LABEL),
        _ => return None,
    };
    Some(label.to_string())
}

fn decode_segment(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            tracing::debug!(segment, error = %err, "keeping undecodable segment");
            segment.to_string()
        }
    }
}

/// Link for the crumb at `index`. A `folders` segment links to its parent.
fn segment_href(segments: &[&str], index: usize) -> String {
    if segments[index] == FOLDERS_SEGMENT {
        join_href(&segments[..index])
    } else {
        join_href(&segments[..=index])
    }
}

fn join_href(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}
