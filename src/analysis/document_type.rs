//! Document categories and classifier labels.

use serde::Serialize;

use crate::llm::LlmError;

/// Closed set of document categories used to pick prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    LegalContract,
    MedicalPolicy,
    TermsOfService,
    PrivacyPolicy,
    MedicalReport,
    GovernmentDocument,
    EmploymentDocument,
    OtherLegal,
    Unknown,
}

impl DocumentCategory {
    /// Every classifiable category, in the order offered to the classifier.
    pub const ALL: [DocumentCategory; 8] = [
        Self::LegalContract,
        Self::MedicalPolicy,
        Self::TermsOfService,
        Self::PrivacyPolicy,
        Self::MedicalReport,
        Self::GovernmentDocument,
        Self::EmploymentDocument,
        Self::OtherLegal,
    ];

    /// Name shown to the classifier, including alternates after `/`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LegalContract => "Legal Contract/Agreement",
            Self::MedicalPolicy => "Medical Policy/Insurance",
            Self::TermsOfService => "Terms of Service",
            Self::PrivacyPolicy => "Privacy Policy",
            Self::MedicalReport => "Medical Report/Prescription",
            Self::GovernmentDocument => "Government Document",
            Self::EmploymentDocument => "Employment Document",
            Self::OtherLegal => "Other Legal Document",
            Self::Unknown => "Unknown",
        }
    }

    /// Key matched against the classifier label.
    pub fn dispatch_key(&self) -> &'static str {
        match self {
            Self::LegalContract => "Legal Contract",
            Self::MedicalPolicy => "Medical Policy",
            Self::TermsOfService => "Terms of Service",
            Self::PrivacyPolicy => "Privacy Policy",
            Self::MedicalReport => "Medical Report",
            Self::GovernmentDocument => "Government Document",
            Self::EmploymentDocument => "Employment Document",
            Self::OtherLegal => "Other Legal Document",
            Self::Unknown => "Unknown",
        }
    }

    /// Derive a category from a free-text classifier label.
    ///
    /// Only the part before the first `/` is considered. An exact
    /// (case-insensitive) key match wins; otherwise the key that occurs
    /// earliest in that prefix is used.
    pub fn from_label(label: &str) -> Self {
        let prefix = label
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if prefix.is_empty() {
            return Self::Unknown;
        }

        if let Some(exact) = Self::ALL
            .iter()
            .find(|c| c.dispatch_key().to_lowercase() == prefix)
        {
            return *exact;
        }

        Self::ALL
            .iter()
            .filter_map(|c| {
                prefix
                    .find(&c.dispatch_key().to_lowercase())
                    .map(|pos| (pos, *c))
            })
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, c)| c)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classifier output: the label kept for display plus the dispatch category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentType {
    pub label: String,
    pub category: DocumentCategory,
}

impl DocumentType {
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let category = DocumentCategory::from_label(&label);
        Self { label, category }
    }

    /// Placeholder used when classification failed.
    pub fn unclassified(err: &LlmError) -> Self {
        Self {
            label: format!("Document Classification (Error: {})", err),
            category: DocumentCategory::Unknown,
        }
    }

    /// No document loaded yet.
    pub fn empty() -> Self {
        Self {
            label: String::new(),
            category: DocumentCategory::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        self.category != DocumentCategory::Unknown
    }

    /// Short name used inside prompts ("Employment Document"), or the raw
    /// label when the category is unknown.
    pub fn subject(&self) -> &str {
        if self.is_known() {
            self.category.dispatch_key()
        } else {
            self.label.trim()
        }
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::empty()
    }
}
