use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

use crate::services::session::CheckoutPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    /// Calendar timezone for day, week, and month boundaries.
    pub time_zone: Tz,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub openai_model: String,
    pub checkout_policy: CheckoutPolicy,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/punchclock".to_string());

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone = parse_time_zone(&time_zone_name)?;

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_api_base = env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

        let checkout_policy_name =
            env::var("CHECKOUT_POLICY").unwrap_or_else(|_| "auto_close_break".to_string());
        let checkout_policy = parse_checkout_policy(&checkout_policy_name)?;

        Ok(Config {
            database_url,
            time_zone,
            openai_api_key,
            openai_api_base,
            openai_model,
            checkout_policy,
        })
    }
}

fn parse_time_zone(name: &str) -> anyhow::Result<Tz> {
    name.parse()
        .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", name))
}

fn parse_checkout_policy(name: &str) -> anyhow::Result<CheckoutPolicy> {
    match name {
        "auto_close_break" => Ok(CheckoutPolicy::AutoCloseBreak),
        "reject" => Ok(CheckoutPolicy::Reject),
        other => Err(anyhow!("Invalid CHECKOUT_POLICY value: {}", other)),
    }
}
