use serde_json::Value;

/// A contact record as returned by the Ontraport API, parsed once at the
/// client boundary. Every field degrades to "absent" on malformed input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    id: Option<u64>,
    first_name: Option<String>,
    email: Option<String>,
}

impl Contact {
    pub fn from_payload(payload: &Value) -> Self {
        let Some(fields) = payload.as_object() else {
            return Self::default();
        };

        Self {
            id: fields.get("id").and_then(parse_contact_id),
            first_name: fields
                .get("firstname")
                .and_then(Value::as_str)
                .map(str::to_owned),
            email: fields
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// True iff the stored email string-equals the expected one exactly.
    /// Case-sensitive, no trimming.
    pub fn is_valid(&self, expected_email: &str) -> bool {
        self.email.as_deref() == Some(expected_email)
    }
}

// Ontraport serializes record ids as numbers or numeric strings depending on
// the endpoint. Only a strictly positive integer counts as an id.
fn parse_contact_id(raw: &Value) -> Option<u64> {
    let id = match raw {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse::<i64>().ok()?,
        _ => return None,
    };

    u64::try_from(id).ok().filter(|id| *id > 0)
}
