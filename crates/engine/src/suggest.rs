//! Autocomplete suggestions
//!
//! A fixed catalog of variables, functions and operators that the editor
//! offers while the user types. Matching is a plain case-insensitive
//! substring test against an entry's display text or value; matches keep
//! catalog order and are capped at a limit.
//!
//! Each entry carries its [`TagStyle`], resolved when the catalog is built,
//! so renderers look styles up by tag identity.
//!
//! [`SuggestionTracker`] models the lookup as a request/response pair: every
//! query gets a ticket and only the newest ticket may install results.

/// Default cap on returned suggestions
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Variable,
    Function,
    Operator,
}

impl SuggestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Operator => "operator",
        }
    }
}

/// Presentation descriptor for a tag chip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagStyle {
    pub color: &'static str,
    pub background: &'static str,
    pub icon: &'static str,
}

impl TagStyle {
    pub const NEUTRAL: TagStyle = TagStyle { color: "#757575", background: "#f5f5f5", icon: "" };
    const FUNCTION: TagStyle = TagStyle { color: "#673ab7", background: "#ede7f6", icon: "ƒ" };

    const fn new(color: &'static str, background: &'static str, icon: &'static str) -> Self {
        Self { color, background, icon }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub id: &'static str,
    pub kind: SuggestionKind,
    /// Inserted into the formula when picked
    pub value: &'static str,
    pub display: &'static str,
    pub style: TagStyle,
}

impl Suggestion {
    fn matches(&self, needle_lower: &str) -> bool {
        self.display.to_lowercase().contains(needle_lower)
            || self.value.to_lowercase().contains(needle_lower)
    }
}

// (id, value, display, style)
const VARIABLES: &[(&str, &str, &str, TagStyle)] = &[
    ("v1", "Base salary", "Base salary", TagStyle::new("#2196f3", "#e3f2fd", "$")),
    ("v2", "Option grant", "Option grant", TagStyle::new("#00796b", "#e0f2f1", "%")),
    ("v3", "Vesting period", "Vesting period (years)", TagStyle::new("#0097a7", "#e0f7fa", "#")),
    ("v4", "Current valuation", "Current valuation", TagStyle::new("#1976d2", "#e3f2fd", "$")),
    ("v5", "Exit valuation", "Exit valuation", TagStyle::new("#0d47a1", "#e3f2fd", "$")),
    ("v6", "Future dilution", "Future dilution", TagStyle::new("#00838f", "#e0f7fa", "%")),
    ("v7", "Annual equity comp", "Annual equity comp", TagStyle::new("#4caf50", "#e8f5e9", "$")),
];

const FUNCTIONS: &[(&str, &str, &str)] = &[
    ("f1", "SUM", "SUM()"),
    ("f2", "AVERAGE", "AVERAGE()"),
    ("f3", "MIN", "MIN()"),
    ("f4", "MAX", "MAX()"),
    ("f5", "COUNT", "COUNT()"),
    ("f6", "FORECAST", "FORECAST()"),
];

const OPERATORS: &[(&str, &str)] = &[
    ("o1", "+"),
    ("o2", "-"),
    ("o3", "*"),
    ("o4", "/"),
    ("o5", "^"),
    ("o6", "("),
    ("o7", ")"),
];

/// The suggestion catalog: variables, then functions, then operators
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<Suggestion>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let variables = VARIABLES.iter().map(|&(id, value, display, style)| Suggestion {
            id,
            kind: SuggestionKind::Variable,
            value,
            display,
            style,
        });
        let functions = FUNCTIONS.iter().map(|&(id, value, display)| Suggestion {
            id,
            kind: SuggestionKind::Function,
            value,
            display,
            style: TagStyle::FUNCTION,
        });
        let operators = OPERATORS.iter().map(|&(id, value)| Suggestion {
            id,
            kind: SuggestionKind::Operator,
            value,
            display: value,
            style: TagStyle::NEUTRAL,
        });

        Self {
            entries: variables.chain(functions).chain(operators).collect(),
        }
    }

    pub fn entries(&self) -> &[Suggestion] {
        &self.entries
    }

    /// Entries matching `query`, in catalog order, at most `limit` of them.
    /// An empty query returns the first `limit` entries.
    pub fn match_query(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        if query.is_empty() {
            return self.entries.iter().take(limit).cloned().collect();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|s| s.matches(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Style for a tag whose value is `name`; unknown names are neutral
    pub fn style_for(&self, name: &str) -> TagStyle {
        self.entries
            .iter()
            .find(|s| s.value == name)
            .map(|s| s.style)
            .unwrap_or(TagStyle::NEUTRAL)
    }
}

/// Identifies one suggestion request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Tracks in-flight suggestion requests. A newer query supersedes any older
/// one; responses for superseded tickets are dropped.
#[derive(Debug, Default)]
pub struct SuggestionTracker {
    next: u64,
    pending: Option<(Ticket, String)>,
    current: Vec<Suggestion>,
}

impl SuggestionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `query`. An empty query clears the current
    /// suggestions and cancels any pending request without issuing a ticket.
    pub fn begin(&mut self, query: &str) -> Option<Ticket> {
        if query.is_empty() {
            self.pending = None;
            self.current.clear();
            return None;
        }
        self.next += 1;
        let ticket = Ticket(self.next);
        if let Some((old, old_query)) = self.pending.replace((ticket, query.to_string())) {
            log::debug!("Suggestion request {:?} for '{}' superseded", old, old_query);
        }
        Some(ticket)
    }

    /// Deliver results for `ticket`. Returns false (and discards) when the
    /// ticket is no longer the latest request.
    pub fn complete(&mut self, ticket: Ticket, results: Vec<Suggestion>) -> bool {
        match &self.pending {
            Some((latest, _)) if *latest == ticket => {
                self.pending = None;
                self.current = results;
                true
            }
            _ => {
                log::debug!("Discarding stale suggestions for {:?}", ticket);
                false
            }
        }
    }

    /// Query of the request still awaiting results, if any
    pub fn pending_query(&self) -> Option<&str> {
        self.pending.as_ref().map(|(_, q)| q.as_str())
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.current
    }
}
