use crate::domain::Contact;
use crate::utils::error_chain_fmt;
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

// Ontraport's object type id for contact records.
const CONTACTS_OBJECT_TYPE: u8 = 0;

pub struct OntraportClient {
    pub base_url: String,
    app_id: String,
    api_key: Secret<String>,
    http_client: Client,
}

/// Whether the provider acknowledged a tag assignment. The provider signals
/// success through a `code` field in the response body, not the HTTP status.
#[derive(Debug, PartialEq, Eq)]
pub enum TagAssignment {
    Accepted,
    Rejected,
}

#[derive(thiserror::Error)]
pub enum OntraportError {
    #[error("Failed to reach the Ontraport API.")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode the Ontraport API response.")]
    MalformedResponse(#[source] anyhow::Error),
    #[error("The Ontraport API answered with code {0}.")]
    Rejected(i64),
}

impl std::fmt::Debug for OntraportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// Every endpoint wraps its payload in `{ "code": ..., "data": ... }`.
#[derive(serde::Deserialize, Debug)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    data: Value,
}

impl OntraportClient {
    pub fn new(
        base_url: String,
        app_id: String,
        api_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            base_url,
            app_id,
            api_key,
            http_client,
        }
    }

    /// Search for contacts whose `email` field equals the given address.
    /// Equality filter only, no fuzzy matching.
    pub async fn search_contacts_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Contact>, OntraportError> {
        let url = format!("{}/1/Contacts", self.base_url);
        let condition = serde_json::json!([{
            "field": { "field": "email" },
            "op": "=",
            "value": { "value": email },
        }]);

        let body = self
            .authenticated(self.http_client.get(&url))
            .query(&[("condition", condition.to_string())])
            .send()
            .await?
            .text()
            .await?;
        let envelope = decode_envelope(&body)?;

        let contacts = envelope
            .data
            .as_array()
            .map(|items| items.iter().map(Contact::from_payload).collect())
            .unwrap_or_default();

        Ok(contacts)
    }

    /// Create a contact. The endpoint expects a form-encoded body; the
    /// originating page, when known, is recorded as the referral page.
    pub async fn create_contact(
        &self,
        first_name: Option<&str>,
        email: &str,
        source_location: Option<&str>,
    ) -> Result<Contact, OntraportError> {
        let url = format!("{}/1/Contacts", self.base_url);
        let mut form = vec![("email", email)];
        if let Some(first_name) = first_name {
            form.push(("firstname", first_name));
        }
        if let Some(source_location) = source_location {
            form.push(("referral_page", source_location));
        }

        let body = self
            .authenticated(self.http_client.post(&url))
            .form(&form)
            .send()
            .await?
            .text()
            .await?;
        let envelope = decode_envelope(&body)?;

        Ok(Contact::from_payload(&envelope.data))
    }

    /// Attach a tag to a contact by name. Only transport-level failures are
    /// errors; any response body without the `code: 0` sentinel is reported
    /// as a rejection.
    pub async fn assign_tag(
        &self,
        contact_id: u64,
        tag: &str,
    ) -> Result<TagAssignment, OntraportError> {
        let url = format!("{}/1/objects/tagByName", self.base_url);
        let request_body = serde_json::json!({
            "objectID": CONTACTS_OBJECT_TYPE,
            "ids": [contact_id],
            "add_names": [tag],
        });

        let body = self
            .authenticated(self.http_client.put(&url))
            .json(&request_body)
            .send()
            .await?
            .text()
            .await?;

        let accepted = matches!(
            serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(|payload| payload.get("code"))
                .and_then(Value::as_i64),
            Some(0)
        );

        Ok(if accepted {
            TagAssignment::Accepted
        } else {
            TagAssignment::Rejected
        })
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Api-Appid", &self.app_id)
            .header("Api-Key", self.api_key.expose_secret())
    }
}

fn decode_envelope(body: &str) -> Result<ApiEnvelope, OntraportError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)
        .context("The response body was not a valid API envelope.")
        .map_err(OntraportError::MalformedResponse)?;

    if envelope.code != 0 {
        return Err(OntraportError::Rejected(envelope.code));
    }

    Ok(envelope)
}


pub mod fixtures {
    use serde_json::Value;

    // Contact fields come back as strings from Ontraport regardless of their
    // declared type.
    pub fn contact_payload(id: u64, first_name: &str, email: &str) -> Value {
        serde_json::json!({
            "id": id.to_string(),
            "firstname": first_name,
            "email": email,
            "owner": "1",
            "bulk_mail": "1",
            "date": "1719307544",
        })
    }

    pub fn search_response(contacts: &[Value]) -> Value {
        serde_json::json!({
            "code": 0,
            "data": contacts,
            "account_id": "187426",
        })
    }

    pub fn created_contact_response(contact: Value) -> Value {
        serde_json::json!({
            "code": 0,
            "data": contact,
            "account_id": "187426",
        })
    }

    pub fn tag_response(code: i64) -> Value {
        serde_json::json!({
            "code": code,
            "data": [],
            "account_id": "187426",
        })
    }
}
