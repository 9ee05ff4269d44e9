use crate::clients::ontraport_client::{OntraportClient, TagAssignment};
use crate::domain::{Contact, SubscriberEmail, TagAllowList};

// Identifier of the remote call surfaced in transport-error responses.
const TAGGING_CALL: &str = "Tagging";

/// Orchestrates the subscription flow: configuration check, tag allow-list
/// check, contact lookup, creation if absent, tag assignment.
pub struct SubscriptionService {
    client: Option<OntraportClient>,
    allowed_tags: TagAllowList,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// Provider credentials are missing; no remote call was attempted.
    Unconfigured,
    /// The requested tag is not in the allow-list; no remote call was
    /// attempted.
    InvalidTag,
    /// No contact could be found or created, or the resolved contact did not
    /// carry the requested email and a usable id.
    ContactUnresolved,
    /// The tag-assignment call failed at the transport level.
    TagAssignmentUnreachable { call: &'static str },
    /// The provider answered the tag-assignment call without the success
    /// sentinel.
    TagAssignmentRejected,
    Subscribed,
}

impl SubscriptionService {
    pub fn new(client: Option<OntraportClient>, allowed_tags: TagAllowList) -> Self {
        Self {
            client,
            allowed_tags,
        }
    }

    /// Every remote call is attempted exactly once; failures along the way
    /// are logged and degrade to the matching outcome instead of propagating.
    pub async fn subscribe(
        &self,
        first_name: Option<&str>,
        email: &SubscriberEmail,
        tag: &str,
        source_location: Option<&str>,
    ) -> SubscribeOutcome {
        let Some(client) = &self.client else {
            return SubscribeOutcome::Unconfigured;
        };
        if !self.allowed_tags.contains(tag) {
            return SubscribeOutcome::InvalidTag;
        }

        let Some(contact) = resolve_contact(client, first_name, email, source_location).await
        else {
            return SubscribeOutcome::ContactUnresolved;
        };
        let Some(contact_id) = contact.id() else {
            tracing::error!(email = %email, "Resolved contact carries no usable id.");
            return SubscribeOutcome::ContactUnresolved;
        };

        match client.assign_tag(contact_id, tag).await {
            Ok(TagAssignment::Accepted) => SubscribeOutcome::Subscribed,
            Ok(TagAssignment::Rejected) => {
                tracing::error!(contact_id, tag, "The provider rejected the tag assignment.");
                SubscribeOutcome::TagAssignmentRejected
            }
            Err(error) => {
                tracing::error!(error = ?error, contact_id, tag, "Tag assignment was unreachable.");
                SubscribeOutcome::TagAssignmentUnreachable { call: TAGGING_CALL }
            }
        }
    }
}

/// Look the contact up by email, creating it when absent. Lookup and creation
/// failures fail open to "no contact"; the resolved contact counts only if
/// its stored email matches the requested one exactly.
async fn resolve_contact(
    client: &OntraportClient,
    first_name: Option<&str>,
    email: &SubscriberEmail,
    source_location: Option<&str>,
) -> Option<Contact> {
    let existing = match client.search_contacts_by_email(email.as_ref()).await {
        // TODO: decide what to do when the search returns more than one
        // contact; for now the first match wins.
        Ok(matches) => matches.into_iter().next(),
        Err(error) => {
            tracing::warn!(error = ?error, "Contact lookup failed, falling back to creation.");
            None
        }
    };

    let contact = match existing {
        Some(contact) => Some(contact),
        None => match client
            .create_contact(first_name, email.as_ref(), source_location)
            .await
        {
            Ok(contact) => Some(contact),
            Err(error) => {
                tracing::warn!(error = ?error, "Contact creation failed.");
                None
            }
        },
    };

    contact.filter(|contact| contact.is_valid(email.as_ref()))
}
