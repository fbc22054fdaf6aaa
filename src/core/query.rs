//! Filter, sort and paginate a fund record set.

use super::fund::{Fund, RiskLevel};
use super::normalize::parse_integer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    YtdReturn,
    OneYearReturn,
    ThreeYearReturn,
    MorningstarRating,
    ManagementFee,
}

impl SortKey {
    fn value(&self, fund: &Fund) -> f64 {
        match self {
            SortKey::YtdReturn => fund.ytd_return,
            SortKey::OneYearReturn => fund.one_year_return,
            SortKey::ThreeYearReturn => fund.three_year_return,
            SortKey::MorningstarRating => fund.morningstar_rating as f64,
            SortKey::ManagementFee => fund.management_fee,
        }
    }

    /// Unknown keys sort by YTD return.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortKey::YtdReturn => "ytd_return",
                SortKey::OneYearReturn => "one_year_return",
                SortKey::ThreeYearReturn => "three_year_return",
                SortKey::MorningstarRating => "morningstar_rating",
                SortKey::ManagementFee => "management_fee",
            }
        )
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ytd_return" => Ok(SortKey::YtdReturn),
            "one_year_return" => Ok(SortKey::OneYearReturn),
            "three_year_return" => Ok(SortKey::ThreeYearReturn),
            "morningstar_rating" => Ok(SortKey::MorningstarRating),
            "management_fee" => Ok(SortKey::ManagementFee),
            _ => Err(anyhow::anyhow!("Invalid sort key: {}", s)),
        }
    }
}

/// Raw, string-typed query parameters as the catalog UI sends them.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub sort_by: Option<String>,
    pub risk_levels: Option<String>,
}

impl QueryParams {
    /// Collects parameters from decoded query pairs. A repeated key keeps its
    /// first value; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = QueryParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "category" => &mut params.category,
                "currency" => &mut params.currency,
                "sortBy" => &mut params.sort_by,
                "riskLevels" => &mut params.risk_levels,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Risk selection. `None` means no risk filter; names that match no band are
/// dropped, so a selection of only unknown names matches nothing.
pub type RiskSelection = Option<BTreeSet<RiskLevel>>;

#[derive(Debug, Clone, PartialEq)]
pub struct FundQuery {
    pub search: String,
    pub categories: Vec<String>,
    pub currency: String,
    pub risk_levels: RiskSelection,
    pub sort_by: SortKey,
    pub page: usize,
    pub limit: usize,
}

impl Default for FundQuery {
    fn default() -> Self {
        FundQuery {
            search: String::new(),
            categories: Vec::new(),
            currency: String::new(),
            risk_levels: None,
            sort_by: SortKey::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.is_empty())
        .collect()
}

fn positive_or(value: Option<&str>, default: usize) -> usize {
    parse_integer(value)
        .and_then(|v| usize::try_from(v).ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl FundQuery {
    /// Builds a query from request parameters. Malformed values fall back to
    /// their defaults rather than failing.
    pub fn from_params(params: &QueryParams) -> Self {
        let risk_names = split_list(params.risk_levels.as_deref());
        let risk_levels = if risk_names.is_empty() {
            None
        } else {
            Some(
                risk_names
                    .iter()
                    .filter_map(|name| name.parse::<RiskLevel>().ok())
                    .collect(),
            )
        };

        FundQuery {
            search: params.search.clone().unwrap_or_default(),
            categories: split_list(params.category.as_deref())
                .into_iter()
                .map(str::to_string)
                .collect(),
            currency: params.currency.clone().unwrap_or_default(),
            risk_levels,
            sort_by: params
                .sort_by
                .as_deref()
                .map(SortKey::parse_or_default)
                .unwrap_or_default(),
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    fn matches_search(&self, fund: &Fund) -> bool {
        self.search.is_empty() || fund.isin.to_lowercase() == self.search.to_lowercase()
    }

    fn matches_category(&self, fund: &Fund) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        let category = fund.category.to_lowercase();
        self.categories
            .iter()
            .any(|prefix| category.starts_with(&prefix.to_lowercase()))
    }

    fn matches_currency(&self, fund: &Fund) -> bool {
        self.currency.is_empty() || fund.currency.to_lowercase() == self.currency.to_lowercase()
    }

    fn matches_risk(&self, fund: &Fund) -> bool {
        self.risk_levels
            .as_ref()
            .is_none_or(|levels| levels.contains(&fund.risk_level))
    }

    /// True when the fund passes every active filter.
    pub fn matches(&self, fund: &Fund) -> bool {
        self.matches_search(fund)
            && self.matches_category(fund)
            && self.matches_currency(fund)
            && self.matches_risk(fund)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundPage {
    pub funds: Vec<Fund>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub limit: usize,
}

/// Filters, sorts (descending, stable) and slices `funds` into one page.
pub fn run_query(funds: &[Fund], query: &FundQuery) -> FundPage {
    let mut matched: Vec<&Fund> = funds.iter().filter(|f| query.matches(f)).collect();

    let key = query.sort_by;
    matched.sort_by(|a, b| {
        key.value(b)
            .partial_cmp(&key.value(a))
            .unwrap_or(Ordering::Equal)
    });

    let total = matched.len();
    let limit = query.limit.max(1);
    let start = query.page.saturating_sub(1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    FundPage {
        funds: matched[start..end].iter().map(|f| (*f).clone()).collect(),
        total,
        page: query.page,
        total_pages: total.div_ceil(limit),
        limit: query.limit,
    }
}
