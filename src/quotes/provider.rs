// Upstream quote provider client
//
// Talks to the insurer aggregation API: password-grant authentication with an
// Origin-pinned endpoint, term-quote acquisition, and proposal creation for
// payment initiation. Holds one token guarded by a TTL; expiry triggers
// re-authentication on the next call.

use anyhow::Context;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{info, warn};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use super::normalizer::{normalize, QuoteBundle, QuoteTracking, RawQuote};
use super::AcquisitionError;
use crate::config::ProviderSettings;
use crate::utils::dates::{age_on, cover_in_crores, parse_dob, risk_profile, to_provider_date};

/// What the quote request form collects about the applicant.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Cover amount in whole rupees.
    pub cover: i64,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub dob: String,
    pub pincode: String,
}

struct TokenState {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct QuoteProvider {
    settings: ProviderSettings,
    http: reqwest::Client,
    token: Mutex<Option<TokenState>>,
}

impl QuoteProvider {
    pub fn new(settings: ProviderSettings) -> anyhow::Result<Self> {
        Url::parse(&settings.base_url)
            .with_context(|| format!("invalid provider base URL: {}", settings.base_url))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            settings,
            http,
            token: Mutex::new(None),
        })
    }

    /// Exchange service credentials for an access token.
    async fn authenticate(&self) -> Result<String, AcquisitionError> {
        info!("[PHASE: QUOTES] [STEP: auth] authenticating with provider");

        let response = self
            .http
            .post(format!("{}/v3/login/verifyPassword", self.settings.base_url))
            .header("Origin", &self.settings.origin)
            .json(&json!({
                "userId": self.settings.user_id,
                "password": self.settings.password,
                "salesChannelUserId": self.settings.sales_channel_user_id,
                "isOtp": false,
            }))
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            warn!(
                "[PHASE: QUOTES] [STEP: auth] provider returned {}",
                response.status()
            );
            return Err(AcquisitionError::AuthRejected);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AcquisitionError::BadResponse(e.to_string()))?;

        let verified = body["isVerified"].as_bool().unwrap_or(false);
        let token = body["accessToken"].as_str().unwrap_or_default();
        if !verified || token.is_empty() {
            return Err(AcquisitionError::AuthRejected);
        }

        Ok(token.to_string())
    }

    /// Return a live token, re-authenticating when the held one has expired.
    async fn bearer_token(&self) -> Result<String, AcquisitionError> {
        let mut guard = self.token.lock().await;

        if let Some(state) = guard.as_ref() {
            if state.expires_at > Utc::now() {
                return Ok(state.access_token.clone());
            }
            info!("[PHASE: QUOTES] [STEP: auth] token expired, refreshing");
        }

        let access_token = self.authenticate().await?;
        *guard = Some(TokenState {
            access_token: access_token.clone(),
            expires_at: Utc::now() + ChronoDuration::minutes(self.settings.token_ttl_minutes),
        });

        Ok(access_token)
    }

    /// Fetch term-insurance quotes for the applicant and return the ranked
    /// bundle with its tracking block.
    pub async fn get_quotes(
        &self,
        profile: &CustomerProfile,
    ) -> Result<QuoteBundle, AcquisitionError> {
        let token = self.bearer_token().await?;

        let provider_dob = to_provider_date(&profile.dob);
        let age = parse_dob(&profile.dob)
            .map(|d| age_on(d, Utc::now().date_naive()))
            .unwrap_or(0);
        let crores = cover_in_crores(profile.cover);
        let request_id = format!("req_{}", Uuid::new_v4().simple());

        info!(
            "[PHASE: QUOTES] [STEP: profile] request {} age {} cover {}cr pincode {} risk {}",
            request_id,
            age,
            crores,
            profile.pincode,
            risk_profile(age, profile.cover).as_str()
        );

        let field_data = build_quote_fields(profile, &provider_dob, age, crores);

        let response = self
            .http
            .post(format!("{}/v3/getQuote/TERM", self.settings.base_url))
            .bearer_auth(&token)
            .header("Origin", &self.settings.origin)
            .json(&json!({ "fieldData": field_data }))
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Transport(format!(
                "quote request failed with status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AcquisitionError::BadResponse(e.to_string()))?;

        let provider_quote_id = match &body["id"] {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        let raw = parse_quote_plans(&body["quotePlans"]);
        let (quotes, summary) = normalize(raw, profile.cover)?;

        let tracking = QuoteTracking {
            request_id: request_id.clone(),
            customer_age: age,
            cover_in_crores: crores,
            pincode: profile.pincode.clone(),
            provider_quote_id,
            timestamp: Utc::now(),
            quotes_count: quotes.len(),
        };

        info!(
            "[PHASE: QUOTES] [STEP: acquire] request {} got {} quotes, best premium {}",
            request_id, summary.total_quotes, summary.best_premium
        );

        Ok(QuoteBundle {
            session_id: format!("track_{}", request_id),
            summary,
            quotes,
            tracking,
        })
    }

    /// Create an upstream proposal; the caller extracts the payment redirect
    /// URL from the returned body.
    pub async fn create_proposal(&self, payload: &Value) -> Result<Value, AcquisitionError> {
        let token = self.bearer_token().await?;

        let response = self
            .http
            .post(format!(
                "{}/v3/proposal/TERM/create",
                self.settings.base_url
            ))
            .bearer_auth(&token)
            .header("Origin", &self.settings.origin)
            .json(payload)
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Transport(format!(
                "proposal creation failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AcquisitionError::BadResponse(e.to_string()))
    }
}

fn map_transport(e: reqwest::Error) -> AcquisitionError {
    if e.is_timeout() {
        AcquisitionError::Timeout
    } else {
        AcquisitionError::Transport(e.to_string())
    }
}

fn field(id: &str, value: impl Into<Value>) -> Value {
    json!({
        "id": id,
        "parentProperty": "proposerDetails",
        "value": value.into(),
    })
}

/// The provider's flat field list for a term quote request. Demographics the
/// quote form does not collect are sent as fixed defaults.
fn build_quote_fields(
    profile: &CustomerProfile,
    provider_dob: &str,
    age: i32,
    crores: i64,
) -> Vec<Value> {
    let name = profile
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("TestUser_{}y_{}Cr", age, crores));
    let phone = profile
        .phone
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "9527119003".to_string());

    vec![
        field("fullName", name),
        field("phoneNumber", phone),
        field("cover", profile.cover.to_string()),
        field("annualIncome", "1000000"),
        field("doYouSmoke", "No"),
        field("gender", "Male"),
        field("dob", provider_dob),
        field("pincode", profile.pincode.as_str()),
        field("educationQualification", "Graduate"),
        field("occupation", "salaried"),
        field("sameAsProposerDetail", "Yes"),
        field("proposerFullName", ""),
        field("proposerGender", ""),
        field("proposerDob", ""),
    ]
}

/// Whole-rupee amount from a JSON number that may arrive fractional.
fn json_rupees(v: &Value) -> i64 {
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f.round() as i64))
        .unwrap_or(0)
}

/// Map the provider's `quotePlans` array into raw quotes, applying the
/// documented defaults for absent fields.
fn parse_quote_plans(plans: &Value) -> Vec<RawQuote> {
    let Some(items) = plans.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, plan)| {
            let plan_data = &plan["planData"];
            let amount_detail = &plan["amountDetail"];
            let paying_amount = json_rupees(&plan["payingAmount"]);

            RawQuote {
                id: plan["id"].as_i64().unwrap_or(index as i64 + 1),
                plan_name: str_or(plan_data, "displayName", "Unknown Plan"),
                premium: paying_amount,
                policy_term: str_or(plan_data, "policyTerm", "36"),
                payment_term: str_or(plan_data, "paymentTerm", "36"),
                payment_frequency: str_or(plan_data, "paymentFrequency", "Yearly"),
                company_name: str_or(plan_data, "companyDisplayName", "Unknown Insurer"),
                company_logo: company_logo(plan_data["companyInternalName"].as_str()),
                brochure: str_or(plan_data, "brochure", ""),
                base_premium: match &amount_detail["basePremium"] {
                    Value::Null => paying_amount,
                    v => json_rupees(v),
                },
                gst: json_rupees(&amount_detail["gst"]),
            }
        })
        .collect()
}

fn str_or(obj: &Value, key: &str, default: &str) -> String {
    obj[key]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Short logo code for an insurer's internal name.
fn company_logo(internal_name: Option<&str>) -> String {
    match internal_name {
        Some("HDFC_LIFE") => "HDFC".to_string(),
        Some("ICICI_PRU") => "ICICI".to_string(),
        Some("SBI_LIFE") => "SBI".to_string(),
        Some("LIC") => "LIC".to_string(),
        Some("MAX_LIFE") => "MAX".to_string(),
        Some(other) if !other.is_empty() => other.chars().take(5).collect(),
        _ => "INS".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            name: Some("Asha Rao".to_string()),
            phone: Some("9812345678".to_string()),
            cover: 10_000_000,
            dob: "1992-04-15".to_string(),
            pincode: "400001".to_string(),
        }
    }

    fn field_value<'a>(fields: &'a [Value], id: &str) -> &'a Value {
        &fields
            .iter()
            .find(|f| f["id"] == id)
            .unwrap_or_else(|| panic!("missing field {}", id))["value"]
    }

    #[test]
    fn quote_fields_carry_converted_dob_and_defaults() {
        let fields = build_quote_fields(&profile(), "15/04/1992", 33, 1);

        assert_eq!(field_value(&fields, "dob"), "15/04/1992");
        assert_eq!(field_value(&fields, "cover"), "10000000");
        assert_eq!(field_value(&fields, "doYouSmoke"), "No");
        assert_eq!(field_value(&fields, "sameAsProposerDetail"), "Yes");
        assert_eq!(field_value(&fields, "educationQualification"), "Graduate");
        assert_eq!(field_value(&fields, "proposerFullName"), "");
    }

    #[test]
    fn quote_fields_generate_placeholder_name_when_absent() {
        let mut p = profile();
        p.name = None;
        let fields = build_quote_fields(&p, "15/04/1992", 33, 1);
        assert_eq!(field_value(&fields, "fullName"), "TestUser_33y_1Cr");
    }

    #[test]
    fn parse_quote_plans_applies_defaults() {
        let plans = json!([
            {
                "id": 6153659,
                "payingAmount": 18291,
                "planData": {
                    "displayName": "iProtect Smart",
                    "companyDisplayName": "ICICI Prudential",
                    "companyInternalName": "ICICI_PRU"
                },
                "amountDetail": { "basePremium": 15500, "gst": 2791 }
            },
            { "payingAmount": 21690.4, "planData": {}, "amountDetail": {} }
        ]);
        let raw = parse_quote_plans(&plans);

        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].id, 6153659);
        assert_eq!(raw[0].company_logo, "ICICI");
        assert_eq!(raw[0].base_premium, 15500);
        assert_eq!(raw[0].gst, 2791);

        assert_eq!(raw[1].id, 2);
        assert_eq!(raw[1].premium, 21690);
        assert_eq!(raw[1].plan_name, "Unknown Plan");
        assert_eq!(raw[1].company_name, "Unknown Insurer");
        assert_eq!(raw[1].policy_term, "36");
        // Absent base premium falls back to the paying amount.
        assert_eq!(raw[1].base_premium, 21690);
        assert_eq!(raw[1].company_logo, "INS");
    }

    #[test]
    fn company_logo_maps_known_insurers() {
        assert_eq!(company_logo(Some("HDFC_LIFE")), "HDFC");
        assert_eq!(company_logo(Some("SBI_LIFE")), "SBI");
        assert_eq!(company_logo(Some("TATA_AIA")), "TATA_");
        assert_eq!(company_logo(None), "INS");
    }

    #[test]
    fn provider_rejects_invalid_base_url() {
        let settings = ProviderSettings {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(QuoteProvider::new(settings).is_err());
    }
}
