use serde::Serialize;

use crate::config::PagingConfig;

pub const DEFAULT_OFFSET: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 10;

pub const OFFSET_PARAM: &str = "$offset";
pub const LIMIT_PARAM: &str = "$limit";

/// Raw `$offset` / `$limit` values as they arrived on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl PagingParams {
    /// Reads the paging parameters from a raw query string. The first
    /// occurrence of a repeated key wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                OFFSET_PARAM if params.offset.is_none() => params.offset = Some(value.into_owned()),
                LIMIT_PARAM if params.limit.is_none() => params.limit = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Resolved window echoed back as paging metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Turns raw parameters into a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagingPolicy {
    max_limit: Option<i64>,
}

impl PagingPolicy {
    pub fn new(max_limit: Option<i64>) -> Self {
        Self { max_limit }
    }

    /// Both parameters must be present and non-empty, otherwise both fall back
    /// to the defaults. Values that are not non-negative integers become 0.
    pub fn resolve(&self, params: &PagingParams) -> Paging {
        let (offset, limit) = match (non_empty(&params.offset), non_empty(&params.limit)) {
            (Some(offset), Some(limit)) => (lenient_int(offset), lenient_int(limit)),
            _ => return Paging::default(),
        };
        let limit = match self.max_limit {
            Some(cap) => limit.min(cap),
            None => limit,
        };
        Paging { offset, limit }
    }
}

impl From<&PagingConfig> for PagingPolicy {
    fn from(config: &PagingConfig) -> Self {
        Self::new(config.max_limit)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn lenient_int(value: &str) -> i64 {
    value.parse::<i64>().ok().filter(|n| *n >= 0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(offset: Option<&str>, limit: Option<&str>) -> PagingParams {
        PagingParams {
            offset: offset.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn defaults_when_both_absent() {
        let paging = PagingPolicy::default().resolve(&PagingParams::default());
        assert_eq!(paging, Paging { offset: 0, limit: 10 });
    }

    #[test]
    fn partial_parameters_do_not_mix_with_defaults() {
        let policy = PagingPolicy::default();
        assert_eq!(policy.resolve(&params(Some("5"), None)), Paging::default());
        assert_eq!(policy.resolve(&params(None, Some("50"))), Paging::default());
        assert_eq!(policy.resolve(&params(Some(""), Some("50"))), Paging::default());
    }

    #[test]
    fn both_present_are_parsed() {
        let paging = PagingPolicy::default().resolve(&params(Some("20"), Some("5")));
        assert_eq!(paging, Paging { offset: 20, limit: 5 });
    }

    #[test]
    fn malformed_and_negative_values_resolve_to_zero() {
        let policy = PagingPolicy::default();
        assert_eq!(
            policy.resolve(&params(Some("abc"), Some("7"))),
            Paging { offset: 0, limit: 7 }
        );
        assert_eq!(
            policy.resolve(&params(Some("3"), Some("1.5"))),
            Paging { offset: 3, limit: 0 }
        );
        assert_eq!(
            policy.resolve(&params(Some("-4"), Some("-1"))),
            Paging { offset: 0, limit: 0 }
        );
        assert_eq!(
            policy.resolve(&params(Some("99999999999999999999"), Some("2"))),
            Paging { offset: 0, limit: 2 }
        );
    }

    #[test]
    fn limit_is_uncapped_unless_configured() {
        let huge = params(Some("0"), Some("1000000"));
        assert_eq!(PagingPolicy::default().resolve(&huge).limit, 1_000_000);
        assert_eq!(PagingPolicy::new(Some(100)).resolve(&huge).limit, 100);
        assert_eq!(
            PagingPolicy::new(Some(100)).resolve(&params(Some("0"), Some("7"))).limit,
            7
        );
    }

    #[test]
    fn reads_first_occurrence_of_encoded_keys() {
        let p = PagingParams::from_query(Some("%24offset=2&$limit=3&$offset=9&other=x"));
        assert_eq!(p, params(Some("2"), Some("3")));
        assert_eq!(PagingParams::from_query(None), PagingParams::default());
        assert_eq!(PagingParams::from_query(Some("offset=1&limit=2")), PagingParams::default());
    }
}
