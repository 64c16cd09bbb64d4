//! Finding extraction: flattens a review document's nested sections into rows.
//!
//! There is one extraction algorithm. [`extract`] produces rich [`Finding`]s;
//! a [`ColumnSet`] then selects which columns a caller sees. The strict column
//! set used for display and CSV export is a projection of the rich one.

use crate::document::{ReviewDocument, Section};

/// A flattened section, denormalised with its parent document and artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub review_id: String,
    pub created_at: String,
    pub artifact: String,
    pub agent: String,
    pub section: Section,
}

/// Every column a finding can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ReviewId,
    CreatedAt,
    Artifact,
    Agent,
    Uuid,
    SectionTitle,
    Sentence,
    PageNumber,
    Observations,
    RuleCitation,
    Recommendations,
    Category,
    Accept,
    AcceptWithChanges,
    Reject,
    RejectReason,
}

const STRICT_COLUMNS: &[Column] = &[
    Column::Uuid,
    Column::SectionTitle,
    Column::Sentence,
    Column::PageNumber,
    Column::Observations,
    Column::RuleCitation,
    Column::Recommendations,
    Column::Category,
    Column::Accept,
    Column::AcceptWithChanges,
    Column::Reject,
    Column::RejectReason,
];

const RICH_COLUMNS: &[Column] = &[
    Column::ReviewId,
    Column::CreatedAt,
    Column::Artifact,
    Column::Agent,
    Column::Uuid,
    Column::SectionTitle,
    Column::Sentence,
    Column::PageNumber,
    Column::Observations,
    Column::RuleCitation,
    Column::Recommendations,
    Column::Category,
    Column::Accept,
    Column::AcceptWithChanges,
    Column::Reject,
    Column::RejectReason,
];

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::ReviewId => "review_id",
            Column::CreatedAt => "created_at",
            Column::Artifact => "artifact",
            Column::Agent => "agent",
            Column::Uuid => "uuid",
            Column::SectionTitle => "section_title",
            Column::Sentence => "sentence",
            Column::PageNumber => "page_number",
            Column::Observations => "observations",
            Column::RuleCitation => "rule_citation",
            Column::Recommendations => "recommendations",
            Column::Category => "category",
            Column::Accept => "accept",
            Column::AcceptWithChanges => "accept_with_changes",
            Column::Reject => "reject",
            Column::RejectReason => "reject_reason",
        }
    }
}

/// Which columns to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnSet {
    /// The section fields only, as shown in the findings table and CSV export.
    #[default]
    Strict,
    /// Section fields preceded by review id, created-at, artifact and agent.
    Rich,
}

impl ColumnSet {
    pub fn columns(self) -> &'static [Column] {
        match self {
            ColumnSet::Strict => STRICT_COLUMNS,
            ColumnSet::Rich => RICH_COLUMNS,
        }
    }

    pub fn names(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.name()).collect()
    }
}

impl std::str::FromStr for ColumnSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ColumnSet::Strict),
            "rich" => Ok(ColumnSet::Rich),
            other => Err(format!("unknown column set `{other}` (expected strict or rich)")),
        }
    }
}

fn display_flag(flag: bool) -> String {
    let text = if flag { "True" } else { "False" };
    text.to_string()
}

impl Finding {
    /// Display string for one column. Flags render as `True`/`False`.
    pub fn cell(&self, column: Column) -> String {
        let s = &self.section;
        match column {
            Column::ReviewId => self.review_id.clone(),
            Column::CreatedAt => self.created_at.clone(),
            Column::Artifact => self.artifact.clone(),
            Column::Agent => self.agent.clone(),
            Column::Uuid => s.uuid.clone(),
            Column::SectionTitle => s.section_title.clone(),
            Column::Sentence => s.sentence.clone(),
            Column::PageNumber => s.page_number.clone().unwrap_or_default(),
            Column::Observations => s.observations.clone(),
            Column::RuleCitation => s.rule_citation.clone(),
            Column::Recommendations => s.recommendations.clone(),
            Column::Category => s.category.clone(),
            Column::Accept => display_flag(s.accept),
            Column::AcceptWithChanges => display_flag(s.accept_with_changes),
            Column::Reject => display_flag(s.reject),
            Column::RejectReason => s.reject_reason.clone(),
        }
    }
}

/// Flatten a document into findings: artifacts in stored order, then
/// sections in stored order. Never fails; may be empty.
pub fn extract(document: &ReviewDocument) -> Vec<Finding> {
    let created_at = document
        .created_at
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    document
        .recommendations
        .iter()
        .flat_map(|(name, artifact)| {
            let agent = artifact.agent_id.clone().unwrap_or_default();
            let created_at = &created_at;
            artifact.sections.iter().map(move |section| Finding {
                review_id: document.id.clone(),
                created_at: created_at.clone(),
                artifact: name.clone(),
                agent: agent.clone(),
                section: section.clone(),
            })
        })
        .collect()
}

/// Findings rendered to display strings under a column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingTable {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl FindingTable {
    pub fn from_findings(findings: &[Finding], set: ColumnSet) -> Self {
        let columns = set.columns().to_vec();
        let rows = findings
            .iter()
            .map(|f| columns.iter().map(|&c| f.cell(c)).collect())
            .collect();
        Self { columns, rows }
    }

    /// Keep only `set`'s columns, in `set`'s order. Columns this table does
    /// not carry are skipped.
    pub fn project(&self, set: ColumnSet) -> Self {
        let picks: Vec<(usize, Column)> = set
            .columns()
            .iter()
            .filter_map(|c| self.columns.iter().position(|have| have == c).map(|i| (i, *c)))
            .collect();
        Self {
            columns: picks.iter().map(|&(_, c)| c).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picks.iter().map(|&(i, _)| row[i].clone()).collect())
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Extraction bound to a column set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    columns: ColumnSet,
}

impl Extractor {
    pub fn new(columns: ColumnSet) -> Self {
        Self { columns }
    }

    /// Extract rich findings and project them onto this extractor's columns.
    pub fn table(&self, document: &ReviewDocument) -> FindingTable {
        FindingTable::from_findings(&extract(document), ColumnSet::Rich).project(self.columns)
    }
}
