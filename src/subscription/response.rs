use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use serde::{Deserialize, Serialize};

/// Payload shape shared by every non-success outcome.
#[derive(Serialize, Deserialize, Debug)]
pub struct EmailSubscriptionMessage {
    pub email_subscription_message: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubscriptionConfirmation {
    pub status: String,
    pub message: String,
}

/// Builds the standardized subscription responses. Every error message is
/// suffixed with the configured support contact.
#[derive(Clone)]
pub struct SubscriptionResponder {
    support_contact: String,
}

impl SubscriptionResponder {
    pub fn new(support_contact: String) -> Self {
        Self { support_contact }
    }

    pub fn unconfigured(&self) -> HttpResponse {
        self.with_message(
            "The subscription service is not configured.",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn transport_error(&self, call: &str) -> HttpResponse {
        self.with_message(
            &format!(
                "There was an error contacting the subscription service ({call}). Please try again later."
            ),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn with_message(&self, message: &str, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status)
            .content_type(ContentType::json())
            .json(EmailSubscriptionMessage {
                email_subscription_message: vec![format!(
                    "{} If the problem persists, contact {}.",
                    message, self.support_contact
                )],
            })
    }

    pub fn success(&self, message: &str) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(ContentType::json())
            .json(SubscriptionConfirmation {
                status: "success".to_string(),
                message: message.to_string(),
            })
    }
}
