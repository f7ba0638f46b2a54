use std::fmt;

const DETAIL_PREFIX: &str = "country-details";

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail { name: String },
    NotFound { path: String },
}

impl Route {
    /// Resolve a navigation path.
    ///
    /// `/` and `/home` map to the list, `/country-details/:name` to the detail
    /// screen, anything else to not-found. Query strings, fragments and a
    /// trailing slash are ignored; the name segment is percent-decoded.
    pub fn parse(path: &str) -> Self {
        let bare = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = bare.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] | ["home"] => Route::List,
            [DETAIL_PREFIX, name] if !name.is_empty() => Route::Detail {
                name: urlencoding::decode(name)
                    .map(|n| n.into_owned())
                    .unwrap_or_else(|_| name.to_string()),
            },
            _ => Route::NotFound { path: path.to_string() },
        }
    }

    pub fn detail(name: impl Into<String>) -> Self {
        Route::Detail { name: name.into() }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail { name } => format!("/{}/{}", DETAIL_PREFIX, urlencoding::encode(name)),
            Route::NotFound { path } => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
