use crate::domain::SubscriberEmail;
use crate::subscription::{SubscribeOutcome, SubscriptionResponder, SubscriptionService};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SubscriptionParams {
    pub first_name: Option<String>,
    pub email: String,
    pub tag: String,
    pub source_location: Option<String>,
}

#[post("/subscriptions")]
#[tracing::instrument(
    name = "Subscribing a visitor",
    skip(params, service, responder),
    fields(email = %params.email, tag = %params.tag)
)]
pub async fn post(
    params: web::Json<SubscriptionParams>,
    service: web::Data<SubscriptionService>,
    responder: web::Data<SubscriptionResponder>,
) -> HttpResponse {
    let params = params.into_inner();
    let email = match SubscriberEmail::parse(params.email) {
        Ok(email) => email,
        Err(error) => {
            tracing::warn!(error = %error, "Rejecting a subscription with an invalid email.");
            return responder.with_message(
                "Please provide a valid email address.",
                StatusCode::BAD_REQUEST,
            );
        }
    };

    let outcome = service
        .subscribe(
            params.first_name.as_deref(),
            &email,
            &params.tag,
            params.source_location.as_deref(),
        )
        .await;

    match outcome {
        SubscribeOutcome::Unconfigured => responder.unconfigured(),
        SubscribeOutcome::InvalidTag => {
            responder.with_message("Invalid list.", StatusCode::INTERNAL_SERVER_ERROR)
        }
        SubscribeOutcome::ContactUnresolved => {
            responder.with_message("Failed to subscribe.", StatusCode::INTERNAL_SERVER_ERROR)
        }
        SubscribeOutcome::TagAssignmentUnreachable { call } => responder.transport_error(call),
        SubscribeOutcome::TagAssignmentRejected => {
            responder.with_message("Some error occurred.", StatusCode::INTERNAL_SERVER_ERROR)
        }
        SubscribeOutcome::Subscribed => responder.success("You have been subscribed."),
    }
}
