//! Twilio REST API client.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TwilioConfig;
use crate::error::TwilioError;

/// Client for the Twilio REST API.
///
/// Covers the small slice of the API the call flow needs: starting a
/// recording on a live call and provisioning incoming phone numbers.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: reqwest::Client,
    config: TwilioConfig,
}

/// A recording resource, as returned by the Recordings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Recording {
    /// Recording SID (`RE...`).
    pub sid: String,
    /// Processing status (`in-progress`, `completed`, ...).
    pub status: Option<String>,
}

/// An incoming phone number resource.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingPhoneNumber {
    /// Number SID (`PN...`).
    pub sid: String,
    /// The number in E.164 form.
    pub phone_number: String,
}

/// An available (purchasable) phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailablePhoneNumber {
    /// The number in E.164 form.
    pub phone_number: String,
    /// Human-readable form.
    pub friendly_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvailableNumbersPage {
    available_phone_numbers: Vec<AvailablePhoneNumber>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl TwilioClient {
    /// Create a client from a config.
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, TwilioError> {
        Ok(Self::new(TwilioConfig::from_env()?))
    }

    fn account_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{}",
            self.config.api_url, self.config.account_sid, resource
        )
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, TwilioError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Start recording a live call.
    ///
    /// Twilio records from this point until the call ends and later posts
    /// the recording URL on the status callback.
    pub async fn start_recording(&self, call_sid: &str) -> Result<Recording, TwilioError> {
        debug!("Starting recording for call {}", call_sid);
        let url = self.account_url(&format!("Calls/{}/Recordings.json", call_sid));
        let recording: Recording = self
            .post_form(&url, &[("RecordingChannels", "dual")])
            .await?;
        info!("Recording {} started for call {}", recording.sid, call_sid);
        Ok(recording)
    }

    /// Search for purchasable local numbers in a country.
    pub async fn search_available_numbers(
        &self,
        country: &str,
        area_code: Option<&str>,
    ) -> Result<Vec<AvailablePhoneNumber>, TwilioError> {
        let mut url = format!(
            "{}?PageSize=20",
            self.account_url(&format!("AvailablePhoneNumbers/{}/Local.json", country))
        );
        if let Some(area_code) = area_code {
            url.push_str(&format!("&AreaCode={}", area_code));
        }

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let page: AvailableNumbersPage = response.json().await?;
        Ok(page.available_phone_numbers)
    }

    /// Purchase a phone number and point its voice webhook at us.
    pub async fn purchase_number(
        &self,
        phone_number: &str,
        voice_url: &str,
    ) -> Result<IncomingPhoneNumber, TwilioError> {
        info!("Purchasing number {}", phone_number);
        let url = self.account_url("IncomingPhoneNumbers.json");
        let number: IncomingPhoneNumber = self
            .post_form(
                &url,
                &[
                    ("PhoneNumber", phone_number),
                    ("VoiceUrl", voice_url),
                    ("VoiceMethod", "POST"),
                ],
            )
            .await?;
        info!("Purchased number {} ({})", number.phone_number, number.sid);
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_url() {
        let client = TwilioClient::new(TwilioConfig::new("AC123", "secret"));
        assert_eq!(
            client.account_url("Calls/CA1/Recordings.json"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Calls/CA1/Recordings.json"
        );
    }

    #[test]
    fn test_parse_available_numbers_page() {
        let json = r#"{
            "available_phone_numbers": [
                {"phone_number": "+15551234567", "friendly_name": "(555) 123-4567"}
            ]
        }"#;
        let page: AvailableNumbersPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.available_phone_numbers.len(), 1);
        assert_eq!(page.available_phone_numbers[0].phone_number, "+15551234567");
    }
}
