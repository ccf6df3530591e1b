//! Runtime settings for the hosted backend and the checkout.
//!
//! Values are layered: built-in defaults, then values baked in at compile time (the only
//! source a browser build has), then an optional `config.toml`, then the process
//! environment (`SUPABASE_URL`, `SUPABASE_ANON_KEY`, `SITE_URL`, `RAZORPAY_KEY_ID`,
//! `CONSULTATION_FEE_PAISE`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use session::Fee;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Supabase {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Razorpay {
    pub key_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub supabase: Supabase,
    pub razorpay: Razorpay,
    pub site_url: String,
    pub consultation_fee_paise: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase: Supabase::default(),
            razorpay: Razorpay {
                key_id: "rzp_test_placeholder".into(),
            },
            site_url: String::new(),
            consultation_fee_paise: 9900,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("supabase.url", "")?
            .set_default("supabase.anon_key", "")?
            .set_default("razorpay.key_id", "rzp_test_placeholder")?
            .set_default("site_url", "")?
            .set_default("consultation_fee_paise", 9900)?;

        for (key, value) in [
            ("supabase.url", option_env!("SUPABASE_URL")),
            ("supabase.anon_key", option_env!("SUPABASE_ANON_KEY")),
            ("razorpay.key_id", option_env!("RAZORPAY_KEY_ID")),
            ("site_url", option_env!("SITE_URL")),
            ("consultation_fee_paise", option_env!("CONSULTATION_FEE_PAISE")),
        ] {
            if let Some(value) = value {
                builder = builder.set_default(key, value)?;
            }
        }

        let config = builder
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_flat_env();
        Ok(settings)
    }

    /// `SUPABASE_URL` style names do not nest under the `__` separator, so they are
    /// picked up explicitly.
    fn apply_flat_env(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
            if let Some(url) = var("SUPABASE_URL") {
                self.supabase.url = url;
            }
            if let Some(key) = var("SUPABASE_ANON_KEY") {
                self.supabase.anon_key = key;
            }
            if let Some(site_url) = var("SITE_URL") {
                self.site_url = site_url;
            }
            if let Some(key) = var("RAZORPAY_KEY_ID") {
                self.razorpay.key_id = key;
            }
            if let Some(paise) = var("CONSULTATION_FEE_PAISE").and_then(|v| v.parse().ok()) {
                self.consultation_fee_paise = paise;
            }
        }
    }

    /// Whether the hosted backend can be reached at all.
    pub fn supabase_configured(&self) -> bool {
        !self.supabase.url.is_empty() && !self.supabase.anon_key.is_empty()
    }

    pub fn fee(&self) -> Fee {
        Fee {
            amount_paise: self.consultation_fee_paise,
            ..Fee::default()
        }
    }

    /// Base URL without a trailing slash.
    pub fn supabase_url(&self) -> &str {
        self.supabase.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_settings() {
        set_var("SUPABASE_URL", "https://abc.supabase.co/");
        set_var("SUPABASE_ANON_KEY", "anon");
        set_var("CONSULTATION_FEE_PAISE", "14900");
        set_var("SITE_URL", "https://unseenlawyers.in");
        let settings = Settings::new().unwrap_or_default();
        println!("Settings = {:?}", settings);
        assert_eq!(settings.supabase_url(), "https://abc.supabase.co");
        assert!(settings.supabase_configured());
        assert_eq!(settings.fee().display(), "₹149");
        assert_eq!(settings.site_url, "https://unseenlawyers.in");
    }

    #[test]
    fn test_unconfigured_by_default() {
        assert!(!Settings::default().supabase_configured());
        assert_eq!(Settings::default().fee(), Fee::default());
    }
}
