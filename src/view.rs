use crate::api::ApiError;
use crate::country::Country;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Sort options offered by the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    RegionAsc,
    RegionDesc,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::RegionAsc,
            Self::RegionAsc => Self::RegionDesc,
            Self::RegionDesc => Self::NameAsc,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::NameAsc => Self::RegionDesc,
            Self::NameDesc => Self::NameAsc,
            Self::RegionAsc => Self::NameDesc,
            Self::RegionDesc => Self::RegionAsc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "Country Name-Asc",
            Self::NameDesc => "Country Name-Desc",
            Self::RegionAsc => "Region-Asc",
            Self::RegionDesc => "Region-Desc",
        }
    }

    pub fn compare(self, a: &Country, b: &Country) -> Ordering {
        match self {
            Self::NameAsc => collate(&a.name.common, &b.name.common),
            Self::NameDesc => collate(&b.name.common, &a.name.common),
            Self::RegionAsc => collate(&a.region, &b.region),
            Self::RegionDesc => collate(&b.region, &a.region),
        }
    }
}

/// Compare base letters first, ignoring case and accents, so "Åland" sorts
/// with the A's. Accents and case break ties, then raw bytes, so distinct
/// strings never compare equal.
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Lowercase letters with diacritics stripped (NFD minus combining marks).
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Indices of `records` whose common name contains `search`
/// (case-insensitive), ordered by `order`. Equal keys keep input order.
pub fn filter_and_sort(records: &[Country], search: &str, order: SortOrder) -> Vec<usize> {
    let needle = search.to_lowercase();
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, c)| needle.is_empty() || c.name.common.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| order.compare(&records[a], &records[b]));
    indices
}

/// What a screen does with its loading flag when the fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub clear_loading_on_error: bool,
    /// Generic text shown in the error banner.
    pub message: &'static str,
}

impl ErrorPolicy {
    pub const LIST: ErrorPolicy = ErrorPolicy {
        clear_loading_on_error: true,
        message: "Error in loading the data",
    };

    pub const DETAIL: ErrorPolicy = ErrorPolicy {
        clear_loading_on_error: false,
        message: "The country data is not loaded...",
    };

    pub fn with_clear_loading(self, clear: bool) -> Self {
        Self { clear_loading_on_error: clear, ..self }
    }
}

/// The `(records, loading, error)` triad owned by one mounted screen.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub records: Vec<Country>,
    pub loading: bool,
    pub error: Option<String>,
    policy: ErrorPolicy,
}

impl ViewState {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            error: None,
            policy,
        }
    }

    /// Apply the outcome of the screen's single fetch.
    pub fn finish(&mut self, result: Result<Vec<Country>, ApiError>) {
        match result {
            Ok(records) => {
                self.records = records;
                self.loading = false;
            }
            Err(e) => {
                if e.is_local() {
                    tracing::error!(error = %e, "screen issued an invalid query");
                } else {
                    tracing::warn!(error = %e, "screen load failed");
                }
                self.error = Some(self.policy.message.to_string());
                if self.policy.clear_loading_on_error {
                    self.loading = false;
                }
            }
        }
    }

    /// Banner visible for the list: only once loading has stopped.
    pub fn banner_after_loading(&self) -> Option<&str> {
        if self.loading { None } else { self.error.as_deref() }
    }
}
