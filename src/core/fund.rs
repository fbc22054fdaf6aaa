//! Fund record and risk band types

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Risk band derived from the 0-99 regulatory risk indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RiskLevel {
    Unrated,
    Low,
    Moderate,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
    #[serde(rename = "Very-High")]
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::Unrated,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::MediumHigh,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Maps a raw risk indicator onto its band. Values outside 0-99 are unrated.
    pub fn from_indicator(indicator: i64) -> Self {
        match indicator {
            1..=20 => RiskLevel::Low,
            21..=40 => RiskLevel::Moderate,
            41..=60 => RiskLevel::MediumHigh,
            61..=80 => RiskLevel::High,
            81..=99 => RiskLevel::VeryHigh,
            _ => RiskLevel::Unrated,
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskLevel::Unrated => "Unrated",
                RiskLevel::Low => "Low",
                RiskLevel::Moderate => "Moderate",
                RiskLevel::MediumHigh => "Medium-High",
                RiskLevel::High => "High",
                RiskLevel::VeryHigh => "Very-High",
            }
        )
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    // Spanish labels are the ones the catalog UI used to send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unrated" | "sin valorar" => Ok(RiskLevel::Unrated),
            "low" | "riesgo bajo" => Ok(RiskLevel::Low),
            "moderate" | "riesgo moderado" => Ok(RiskLevel::Moderate),
            "medium-high" | "riesgo medio-alto" => Ok(RiskLevel::MediumHigh),
            "high" | "riesgo alto" => Ok(RiskLevel::High),
            "very-high" | "riesgo muy alto" => Ok(RiskLevel::VeryHigh),
            _ => Err(anyhow::anyhow!("Invalid risk level: {}", s)),
        }
    }
}

/// One tradable share class of a fund, as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    pub isin: String,
    pub name: String,
    pub currency: String,
    pub category: String,
    pub subcategory: String,
    pub management_fee: f64,
    pub success_fee: f64,
    pub min_investment: f64,
    pub min_investment_currency: String,
    /// Assets under management, kept verbatim from the source.
    pub aum: String,
    pub ytd_return: f64,
    pub one_year_return: f64,
    pub three_year_return: f64,
    pub five_year_return: f64,
    pub management_company: String,
    pub factsheet_url: String,
    pub kiid_url: String,
    pub risk_level: RiskLevel,
    pub morningstar_rating: i64,
    pub available_for_implicit_advisory: bool,
}
