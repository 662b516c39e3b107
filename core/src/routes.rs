//! Page routes.

use std::fmt;

use crate::types::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    ClientList,
    ClientDetail(ClientId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::ClientList => "/clients".to_string(),
            Route::ClientDetail(id) => format!("/clients/{id}"),
        }
    }

    /// Paths must be absolute; an empty path is the dashboard. Trailing
    /// slashes are ignored; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let Some(rest) = path.strip_prefix('/') else {
            return path.is_empty().then_some(Route::Dashboard);
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Some(Route::Dashboard);
        }
        let mut segments = rest.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("clients"), None, _) => Some(Route::ClientList),
            (Some("clients"), Some(id), None) => id.parse().ok().map(Route::ClientDetail),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(Route::Dashboard.path(), "/");
        assert_eq!(Route::ClientList.path(), "/clients");
        assert_eq!(Route::ClientDetail(12).path(), "/clients/12");
    }

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Dashboard));
        assert_eq!(Route::parse(""), Some(Route::Dashboard));
        assert_eq!(Route::parse("/clients"), Some(Route::ClientList));
        assert_eq!(Route::parse("/clients/"), Some(Route::ClientList));
        assert_eq!(Route::parse("/clients/7"), Some(Route::ClientDetail(7)));
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/clients/abc"), None);
        assert_eq!(Route::parse("/clients/7/full"), None);
        assert_eq!(Route::parse("/loans"), None);
    }

    #[test]
    fn parse_requires_leading_slash() {
        assert_eq!(Route::parse("loans"), None);
        assert_eq!(Route::parse("clients"), None);
        assert_eq!(Route::parse("clients/7"), None);
        assert_eq!(Route::parse("//clients"), None);
    }
}
