use serde::Serialize;

use crate::dialect::PAGE_PROP;
use crate::sync::RefLoc;

/// A milestone reference found on its own line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Milestone {
    pub reference: String,
    /// 0-based line of the milestone in the source.
    pub line: usize,
    pub prop: Option<String>,
}

impl Milestone {
    pub fn is_page(&self) -> bool {
        self.prop.as_deref() == Some(PAGE_PROP)
    }
}

/// The `"page"` milestones as `(reference, line)` pairs, in document order.
pub fn page_table(milestones: &[Milestone]) -> Vec<RefLoc<usize>> {
    milestones
        .iter()
        .filter(|milestone| milestone.is_page())
        .map(|milestone| RefLoc::new(milestone.reference.clone(), milestone.line))
        .collect()
}
