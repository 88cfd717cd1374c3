use std::{collections::BTreeMap, time::Duration};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

// Client for the Stripe compatible payment-intent API
#[derive(Clone)]
pub struct PaymentClient {
    http_client: Client,
    base_url: String,
    secret_key: SecretString,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug)]
pub struct CreateIntentRequest<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub metadata: BTreeMap<String, String>,
}

impl PaymentClient {
    pub fn new(
        base_url: String,
        secret_key: SecretString,
        timeout: Duration,
    ) -> Result<PaymentClient, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.base_url)
    }

    #[tracing::instrument("Creating payment intent", skip(self))]
    pub async fn create_payment_intent(
        &self,
        request: CreateIntentRequest<'_>,
    ) -> Result<PaymentIntent, reqwest::Error> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), request.amount.to_string()),
            ("currency".into(), request.currency.to_lowercase()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        form.extend(
            request
                .metadata
                .into_iter()
                .map(|(key, value)| (format!("metadata[{}]", key), value)),
        );

        self.http_client
            .post(self.intents_url())
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<PaymentIntent>()
            .await
    }

    #[tracing::instrument("Retrieving payment intent", skip(self))]
    pub async fn retrieve_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, reqwest::Error> {
        self.http_client
            .get(format!("{}/{}", self.intents_url(), intent_id))
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json::<PaymentIntent>()
            .await
    }

    #[tracing::instrument("Cancelling payment intent", skip(self))]
    pub async fn cancel_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, reqwest::Error> {
        self.post_action(intent_id, "cancel").await
    }

    #[tracing::instrument("Confirming payment intent", skip(self))]
    pub async fn confirm_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, reqwest::Error> {
        self.post_action(intent_id, "confirm").await
    }

    async fn post_action(&self, intent_id: &str, action: &str) -> Result<PaymentIntent, reqwest::Error> {
        self.http_client
            .post(format!("{}/{}/{}", self.intents_url(), intent_id, action))
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json::<PaymentIntent>()
            .await
    }
}
