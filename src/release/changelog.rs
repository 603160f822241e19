//! Release note model: prefix classification and markdown rendering
//!
//! Classification is exact prefix matching on the commit subject, compared
//! case-insensitively. No conventional-commit parsing happens here; a subject
//! like `feature flag cleanup` counts as a feature because it starts with `feat`.

use serde::Serialize;
use std::fmt;

/// Release note sections, in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ChangeCategory {
  Features,
  Fixes,
  /// Also receives every subject that matches no known prefix
  DocsAndChores,
}

impl ChangeCategory {
  /// Fixed render order
  pub const ALL: [ChangeCategory; 3] = [
    ChangeCategory::Features,
    ChangeCategory::Fixes,
    ChangeCategory::DocsAndChores,
  ];

  /// Section heading text
  pub fn display_name(&self) -> &'static str {
    match self {
      Self::Features => "Features",
      Self::Fixes => "Fixes",
      Self::DocsAndChores => "Docs and Chores",
    }
  }

  fn index(self) -> usize {
    match self {
      Self::Features => 0,
      Self::Fixes => 1,
      Self::DocsAndChores => 2,
    }
  }
}

impl fmt::Display for ChangeCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

/// Ordered prefix table used to classify subjects
///
/// Rules are checked top to bottom and the first match wins, which gives
/// Features priority over Fixes over DocsAndChores.
#[derive(Debug, Clone)]
pub struct PrefixRules {
  rules: Vec<(ChangeCategory, Vec<String>)>,
}

impl Default for PrefixRules {
  fn default() -> Self {
    Self::new(vec![
      (ChangeCategory::Features, vec!["feat"]),
      (ChangeCategory::Fixes, vec!["fix"]),
      (
        ChangeCategory::DocsAndChores,
        vec!["docs", "chore", "refactor", "perf", "test"],
      ),
    ])
  }
}

impl PrefixRules {
  /// Build a rule table; prefixes are stored lowercased
  pub fn new(rules: Vec<(ChangeCategory, Vec<&str>)>) -> Self {
    Self {
      rules: rules
        .into_iter()
        .map(|(category, prefixes)| (category, prefixes.into_iter().map(str::to_lowercase).collect()))
        .collect(),
    }
  }

  /// Category for a subject, falling back to DocsAndChores when nothing matches
  pub fn classify(&self, subject: &str) -> ChangeCategory {
    self.matching(subject).unwrap_or(ChangeCategory::DocsAndChores)
  }

  /// First rule whose prefix starts the subject, if any
  pub fn matching(&self, subject: &str) -> Option<ChangeCategory> {
    let lower = subject.to_lowercase();
    self
      .rules
      .iter()
      .find(|(_, prefixes)| prefixes.iter().any(|p| lower.starts_with(p.as_str())))
      .map(|(category, _)| *category)
  }
}

/// QA checklist appended to every release note
pub const QA_CHECKLIST: [&str; 5] = [
  "App launches on a clean profile",
  "Main window renders the packaged web bundle",
  "Saved data loads from the previous release",
  "External links open in the system browser",
  "No errors in the developer console",
];

/// Generated release note
#[derive(Debug, Clone)]
pub struct ReleaseNote {
  /// Version for this release
  pub version: String,
  /// Date of the release (YYYY-MM-DD)
  pub date: String,
  /// Human-readable description of the history range
  pub range: String,
  /// Subjects per category, indexed in render order
  sections: [Vec<String>; 3],
}

impl ReleaseNote {
  /// Create an empty release note
  pub fn new(version: impl Into<String>, date: impl Into<String>, range: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      date: date.into(),
      range: range.into(),
      sections: Default::default(),
    }
  }

  /// Classify and add subjects, keeping their order within each section
  pub fn add_subjects<I, S>(&mut self, rules: &PrefixRules, subjects: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for subject in subjects {
      let subject = subject.into();
      let category = rules.classify(&subject);
      self.sections[category.index()].push(subject);
    }
  }

  /// Subjects listed under a category
  pub fn entries(&self, category: ChangeCategory) -> &[String] {
    &self.sections[category.index()]
  }

  /// Total number of subjects across all sections
  pub fn total(&self) -> usize {
    self.sections.iter().map(Vec::len).sum()
  }

  /// Render as markdown
  pub fn to_markdown(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Release Notes - v{}\n\n", self.version));
    output.push_str(&format!("Date: {}\n", self.date));
    output.push_str(&format!("Range: {}\n\n", self.range));

    for category in ChangeCategory::ALL {
      output.push_str(&format!("## {}\n\n", category.display_name()));

      let entries = self.entries(category);
      if entries.is_empty() {
        output.push_str("- (none)\n");
      } else {
        for subject in entries {
          output.push_str(&format!("- {}\n", subject));
        }
      }

      output.push('\n');
    }

    output.push_str("## QA Checklist\n\n");
    for item in QA_CHECKLIST {
      output.push_str(&format!("- [ ] {}\n", item));
    }

    output
  }
}
