use crate::clients::ontraport_client::OntraportClient;
use crate::domain::TagAllowList;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub hosts: HostSettings,
    pub ontraport: OntraportSettings,
    pub subscription: SubscriptionSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct HostSettings {
    pub client: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct OntraportSettings {
    pub base_url: String,
    pub app_id: Option<String>,
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl OntraportSettings {
    // Both credentials are required for any remote call; a partial pair
    // leaves the integration unconfigured.
    pub fn client(&self) -> Option<OntraportClient> {
        let app_id = self.app_id.clone()?;
        let api_key = self.api_key.clone()?;

        Some(OntraportClient::new(
            self.base_url.clone(),
            app_id,
            api_key,
            self.timeout(),
        ))
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct SubscriptionSettings {
    pub allowed_tags: String,
    pub support_contact: String,
}

impl SubscriptionSettings {
    pub fn tag_allow_list(&self) -> TagAllowList {
        TagAllowList::parse(&self.allowed_tags)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment, defaulting to `local`.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Settings from environment variables (with a prefix of APP and `__`
        // as separator), e.g. `APP_ONTRAPORT__API_KEY=...`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
