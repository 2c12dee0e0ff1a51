// Date-of-birth helpers shared by the quote provider and payment flow.
//
// The upstream quoting provider expects dates as DD/MM/YYYY while the intake
// forms collect ISO YYYY-MM-DD; conversion and calendar-age math live here so
// the provider client stays free of string fiddling.

use chrono::{Datelike, NaiveDate, Utc};

/// Convert an ISO `YYYY-MM-DD` date string into the provider's `DD/MM/YYYY`
/// form. Strings already in provider form (no `-`) pass through unchanged.
pub fn to_provider_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => date.trim().to_string(),
    }
}

/// Parse a date of birth in either `YYYY-MM-DD` or `DD/MM/YYYY` form.
pub fn parse_dob(date: &str) -> Option<NaiveDate> {
    let s = date.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

/// Calendar age on a given day, accounting for month/day rollover rather than
/// doing a plain year subtraction.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Calendar age as of today (UTC). `None` when the date string is unparseable.
pub fn calculate_age(dob: &str) -> Option<i32> {
    parse_dob(dob).map(|d| age_on(d, Utc::now().date_naive()))
}

/// Risk tier derived from applicant age and cover amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskProfile {
    LowRisk,
    MediumRisk,
    HighRisk,
    VeryHighRisk,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::LowRisk => "LOW_RISK",
            RiskProfile::MediumRisk => "MEDIUM_RISK",
            RiskProfile::HighRisk => "HIGH_RISK",
            RiskProfile::VeryHighRisk => "VERY_HIGH_RISK",
        }
    }
}

const RUPEES_PER_CRORE: i64 = 10_000_000;

/// Cover amount expressed in whole crores, rounded down.
pub fn cover_in_crores(cover_amount: i64) -> i64 {
    cover_amount / RUPEES_PER_CRORE
}

/// Risk tier thresholds: age < 30 and cover <= 1 crore is the lowest tier,
/// age < 40 and cover <= 2 crores the next, age < 50 and cover <= 5 crores
/// the next, everything else the highest.
pub fn risk_profile(age: i32, cover_amount: i64) -> RiskProfile {
    let crores = cover_in_crores(cover_amount);
    if age < 30 && crores <= 1 {
        RiskProfile::LowRisk
    } else if age < 40 && crores <= 2 {
        RiskProfile::MediumRisk
    } else if age < 50 && crores <= 5 {
        RiskProfile::HighRisk
    } else {
        RiskProfile::VeryHighRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn converts_iso_to_provider_format() {
        assert_eq!(to_provider_date("1992-04-15"), "15/04/1992");
    }

    #[test]
    fn provider_format_passes_through() {
        assert_eq!(to_provider_date("15/04/1992"), "15/04/1992");
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let dob = date(1992, 4, 15);
        assert_eq!(age_on(dob, date(2025, 4, 14)), 32);
        assert_eq!(age_on(dob, date(2025, 4, 15)), 33);
        assert_eq!(age_on(dob, date(2026, 1, 1)), 33);
    }

    #[test]
    fn one_crore_cover_at_33_is_medium_risk() {
        // Reference scenario: DOB 1992-04-15, cover 1,00,00,000, any today
        // after 2025-04-15 gives age 33.
        let dob = parse_dob("1992-04-15").unwrap();
        let age = age_on(dob, date(2025, 8, 1));
        assert_eq!(age, 33);
        assert_eq!(risk_profile(age, 10_000_000), RiskProfile::MediumRisk);
    }

    #[test]
    fn risk_tiers_follow_thresholds() {
        assert_eq!(risk_profile(25, 10_000_000), RiskProfile::LowRisk);
        assert_eq!(risk_profile(25, 20_000_000), RiskProfile::MediumRisk);
        assert_eq!(risk_profile(45, 50_000_000), RiskProfile::HighRisk);
        assert_eq!(risk_profile(55, 10_000_000), RiskProfile::VeryHighRisk);
        assert_eq!(risk_profile(30, 60_000_000), RiskProfile::VeryHighRisk);
    }

    #[test]
    fn unparseable_dob_yields_none() {
        assert_eq!(calculate_age("not-a-date"), None);
    }
}
