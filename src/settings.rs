use crate::api::{endpoint, Error};
use crate::model;
use config::Config;

pub const API_URL: &str = "https://www.talent-monitoring.com/prod-api";
const ENV_PREFIX: &str = "PYTALENT";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub api_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub timezone: String,
}

impl Settings {
    /// Read settings from `PYTALENT_*` environment variables on top of built-in defaults.
    pub fn read() -> Result<Settings, Error> {
        Settings::read_with_prefix(ENV_PREFIX)
    }

    fn read_with_prefix(prefix: &str) -> Result<Settings, Error> {
        let mut settings = Config::default();
        settings
            .set_default("api_url", API_URL)?
            .set_default("timezone", endpoint::TIMEZONE)?
            .merge(config::Environment::with_prefix(prefix))?;

        Ok(settings.try_into::<Settings>()?)
    }

    /// Values given on the command line win over the environment. Empty strings count as unset.
    pub fn with_overrides(
        mut self,
        username: Option<String>,
        password: Option<String>,
        api_url: Option<String>,
    ) -> Settings {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.username = username;
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        if let Some(api_url) = api_url.filter(|u| !u.is_empty()) {
            self.api_url = api_url;
        }
        self
    }

    pub fn api(&self) -> model::Api {
        model::Api {
            api_url: self.api_url.trim_end_matches('/').to_owned(),
            username: self.username.to_owned(),
            password: self.password.to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn settings() -> Settings {
        Settings {
            api_url: API_URL.to_string(),
            username: "env-user".to_string(),
            password: "env-pass".to_string(),
            timezone: endpoint::TIMEZONE.to_string(),
        }
    }

    #[test]
    fn command_line_overrides_environment() {
        let settings = settings().with_overrides(
            Some("cli-user".to_string()),
            None,
            Some("http://localhost:8080/".to_string()),
        );
        assert_eq!("cli-user", settings.username);
        assert_eq!("env-pass", settings.password);

        let api = settings.api();
        assert_eq!("http://localhost:8080", api.api_url);
    }

    #[test]
    fn empty_override_keeps_environment_value() {
        let settings = settings().with_overrides(Some(String::new()), Some(String::new()), None);
        assert_eq!("env-user", settings.username);
        assert_eq!("env-pass", settings.password);
    }

    #[test]
    fn defaults_apply_without_environment() {
        /* nothing in the environment carries this prefix */
        let settings = Settings::read_with_prefix("TALENTMONITOR_UNSET").unwrap();
        assert_eq!(API_URL, settings.api_url);
        assert_eq!(endpoint::TIMEZONE, settings.timezone);
        assert!(settings.username.is_empty());
        assert!(settings.password.is_empty());
    }

    // Only test touching PYTALENT_* variables, so it cannot race with the others.
    #[test]
    fn credentials_fall_back_to_environment() {
        std::env::set_var("PYTALENT_USERNAME", "env-user");
        std::env::set_var("PYTALENT_PASSWORD", "12345");
        std::env::set_var("PYTALENT_API_URL", "http://localhost:9000/");

        let from_env = Settings::read().unwrap().with_overrides(None, None, None);
        let from_cli = Settings::read()
            .unwrap()
            .with_overrides(Some("cli-user".to_string()), None, None);

        std::env::remove_var("PYTALENT_USERNAME");
        std::env::remove_var("PYTALENT_PASSWORD");
        std::env::remove_var("PYTALENT_API_URL");

        assert_eq!("env-user", from_env.username);
        assert_eq!("12345", from_env.password);
        assert_eq!("http://localhost:9000", from_env.api().api_url);

        assert_eq!("cli-user", from_cli.username);
        assert_eq!("12345", from_cli.password);
    }
}
