// Quote normalization
// Pure transformation from raw insurer plan records to a ranked, annotated
// bundle. No I/O here; premiums are exact whole rupees throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::AcquisitionError;

/// One insurer plan as parsed from the provider response, before ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub id: i64,
    pub plan_name: String,
    /// Paying amount in whole rupees.
    pub premium: i64,
    pub policy_term: String,
    pub payment_term: String,
    pub payment_frequency: String,
    pub company_name: String,
    pub company_logo: String,
    pub brochure: String,
    pub base_premium: i64,
    pub gst: i64,
}

/// A raw quote annotated with its ranking against the rest of the bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuote {
    #[serde(flatten)]
    pub quote: RawQuote,
    /// Premium delta against the cheapest quote in the bundle.
    pub savings: i64,
    /// True for every quote sharing the minimum premium.
    pub is_recommended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub total_quotes: usize,
    pub cover_amount: i64,
    pub best_premium: i64,
    pub max_savings: i64,
    pub insurers_count: usize,
}

/// Per-acquisition audit trail carried alongside the quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTracking {
    pub request_id: String,
    pub customer_age: i32,
    pub cover_in_crores: i64,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_quote_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub quotes_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBundle {
    pub session_id: String,
    pub summary: QuoteSummary,
    pub quotes: Vec<NormalizedQuote>,
    pub tracking: QuoteTracking,
}

/// Rank raw quotes: annotate savings and recommendation, sort ascending by
/// premium (stable, so equal premiums keep arrival order), and summarize.
pub fn normalize(
    raw: Vec<RawQuote>,
    cover_amount: i64,
) -> Result<(Vec<NormalizedQuote>, QuoteSummary), AcquisitionError> {
    if raw.is_empty() {
        return Err(AcquisitionError::NoQuotesAvailable);
    }

    let min_premium = raw.iter().map(|q| q.premium).min().unwrap_or(0);
    let max_premium = raw.iter().map(|q| q.premium).max().unwrap_or(0);
    let insurers: HashSet<&str> = raw.iter().map(|q| q.company_name.as_str()).collect();
    let insurers_count = insurers.len();
    let total = raw.len();

    let mut quotes: Vec<NormalizedQuote> = raw
        .into_iter()
        .map(|quote| NormalizedQuote {
            savings: quote.premium - min_premium,
            is_recommended: quote.premium == min_premium,
            quote,
        })
        .collect();
    quotes.sort_by_key(|q| q.quote.premium);

    let summary = QuoteSummary {
        total_quotes: total,
        cover_amount,
        best_premium: min_premium,
        max_savings: max_premium - min_premium,
        insurers_count,
    };

    Ok((quotes, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, company: &str, plan: &str, premium: i64) -> RawQuote {
        RawQuote {
            id,
            plan_name: plan.to_string(),
            premium,
            policy_term: "36".to_string(),
            payment_term: "36".to_string(),
            payment_frequency: "Yearly".to_string(),
            company_name: company.to_string(),
            company_logo: company.chars().take(5).collect(),
            brochure: String::new(),
            base_premium: premium,
            gst: 0,
        }
    }

    #[test]
    fn ranks_cheapest_first_with_savings() {
        let input = vec![
            raw(2, "HDFC Life", "Click 2 Protect Life", 21690),
            raw(1, "ICICI Prudential", "iProtect Smart", 18291),
        ];
        let (quotes, summary) = normalize(input, 10_000_000).unwrap();

        assert_eq!(quotes[0].quote.premium, 18291);
        assert_eq!(quotes[0].savings, 0);
        assert!(quotes[0].is_recommended);
        assert_eq!(quotes[1].quote.premium, 21690);
        assert_eq!(quotes[1].savings, 3399);
        assert!(!quotes[1].is_recommended);

        assert_eq!(summary.total_quotes, 2);
        assert_eq!(summary.best_premium, 18291);
        assert_eq!(summary.max_savings, 3399);
        assert_eq!(summary.insurers_count, 2);
        assert_eq!(summary.cover_amount, 10_000_000);
    }

    #[test]
    fn ties_for_minimum_are_all_recommended() {
        let input = vec![
            raw(1, "A Life", "Plan A", 12000),
            raw(2, "B Life", "Plan B", 12000),
            raw(3, "C Life", "Plan C", 15000),
        ];
        let (quotes, _) = normalize(input, 5_000_000).unwrap();

        assert!(quotes[0].is_recommended);
        assert!(quotes[1].is_recommended);
        assert!(!quotes[2].is_recommended);
        // Stable sort keeps arrival order for the tie.
        assert_eq!(quotes[0].quote.id, 1);
        assert_eq!(quotes[1].quote.id, 2);
    }

    #[test]
    fn duplicate_insurer_counted_once() {
        let input = vec![
            raw(1, "A Life", "Plan A", 12000),
            raw(2, "A Life", "Plan A Plus", 14000),
        ];
        let (_, summary) = normalize(input, 5_000_000).unwrap();
        assert_eq!(summary.insurers_count, 1);
    }

    #[test]
    fn empty_input_is_no_quotes_available() {
        let err = normalize(vec![], 5_000_000).unwrap_err();
        assert!(matches!(err, AcquisitionError::NoQuotesAvailable));
    }

    #[test]
    fn single_quote_has_zero_savings_span() {
        let (quotes, summary) = normalize(vec![raw(1, "A Life", "Plan A", 9000)], 1).unwrap();
        assert_eq!(quotes.len(), 1);
        assert!(quotes[0].is_recommended);
        assert_eq!(summary.max_savings, 0);
    }
}
