//! Fixed Mermaid flowchart templates
//!
//! Two templates exist: a three-environment QuickSight BI reference
//! architecture and a generic web architecture. Template text lives under
//! `templates/` and is embedded at compile time.

const QUICKSIGHT_BI_TEMPLATE: &str = include_str!("../templates/quicksight_bi.mmd");
const GENERIC_TEMPLATE: &str = include_str!("../templates/generic.mmd");

/// Which template a request selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    QuickSightBi,
    Generic,
}

impl DiagramKind {
    /// Exact, case-sensitive match on `"quicksight-bi"`; anything else is generic.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "quicksight-bi" => DiagramKind::QuickSightBi,
            _ => DiagramKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::QuickSightBi => "quicksight-bi",
            DiagramKind::Generic => "generic",
        }
    }

    /// Render the diagram markup.
    ///
    /// `description` is accepted for API compatibility but is not
    /// interpolated: both templates are fixed text.
    pub fn render(&self, _description: &str) -> String {
        match self {
            DiagramKind::QuickSightBi => QUICKSIGHT_BI_TEMPLATE.to_string(),
            DiagramKind::Generic => GENERIC_TEMPLATE.to_string(),
        }
    }
}

impl std::fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
