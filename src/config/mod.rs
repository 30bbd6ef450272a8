use rocket::Config as RocketConfig;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use std::env;
use std::time::Duration;

pub struct Config;

impl Config {
    fn figment() -> Figment {
        // Get the current profile
        let profile = env::var("ROCKET_PROFILE")
            .unwrap_or_else(|_| RocketConfig::DEFAULT_PROFILE.to_string());

        Figment::from(RocketConfig::default())
            .merge(Toml::file("Rocket.toml").nested())
            .select(&profile)
            .merge(Env::prefixed("ROCKET_").global())
    }

    pub fn village_name() -> String {
        Self::figment()
            .extract_inner("village_name")
            .unwrap_or_else(|_| "गोमेवाडी".to_string())
    }

    pub fn taluka() -> String {
        Self::figment()
            .extract_inner("taluka")
            .unwrap_or_else(|_| "आटपाडी".to_string())
    }

    pub fn district() -> String {
        Self::figment()
            .extract_inner("district")
            .unwrap_or_else(|_| "सांगली".to_string())
    }

    /// UPI QR shown next to the screenshot upload for fee-bearing certificates.
    pub fn payment_qr_url() -> String {
        Self::figment()
            .extract_inner("payment_qr_url")
            .unwrap_or_else(|_| {
                "https://placehold.co/150x150/1B5E20/FFFFFF?text=SCAN+20+Rs".to_string()
            })
    }

    /// Base URL serving `/devworks` and `/qr`. Built-in content is used when unset.
    pub fn upstream_api_url() -> Option<String> {
        Self::figment()
            .extract_inner::<String>("upstream_api_url")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    /// Remote endpoint that receives validated certificate requests.
    pub fn submission_endpoint() -> Option<String> {
        Self::figment()
            .extract_inner::<String>("submission_endpoint")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn submission_delay() -> Duration {
        let millis: u64 = Self::figment()
            .extract_inner("submission_delay_ms")
            .unwrap_or(1500);
        Duration::from_millis(millis)
    }

    pub fn submission_failure_rate() -> f64 {
        Self::figment()
            .extract_inner("submission_failure_rate")
            .unwrap_or(0.1)
    }

    pub fn max_screenshot_bytes() -> usize {
        Self::figment()
            .extract_inner("max_screenshot_bytes")
            .unwrap_or(5 * 1024 * 1024)
    }

    pub fn is_simulated_backend() -> bool {
        Self::submission_endpoint().is_none()
    }
}
