// Credential handling. The four OAuth 1.0a values come either from the
// process environment or from form input; the choice is modeled as an
// explicit tagged source resolved once per submit action. Nothing here is
// ever written to disk.

/// The four opaque strings Twitter's OAuth 1.0a user context requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Read all four values from the environment. A missing variable
    /// resolves to the empty string rather than an error; whether the
    /// resulting set is usable is decided at submit time.
    pub fn from_env() -> Self {
        Credentials {
            consumer_key: env_or_empty("CONSUMER_KEY"),
            consumer_secret: env_or_empty("CONSUMER_SECRET"),
            access_token: env_or_empty("ACCESS_TOKEN"),
            access_token_secret: env_or_empty("ACCESS_TOKEN_SECRET"),
        }
    }

    /// True when every field is empty, i.e. there is nothing to sign with.
    pub fn is_empty(&self) -> bool {
        self.consumer_key.is_empty()
            && self.consumer_secret.is_empty()
            && self.access_token.is_empty()
            && self.access_token_secret.is_empty()
    }
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Where the credentials for one submit action come from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Use `CONSUMER_KEY` / `CONSUMER_SECRET` / `ACCESS_TOKEN` /
    /// `ACCESS_TOKEN_SECRET` from the environment.
    Environment,
    /// Use the values typed into the form.
    UserSupplied(Credentials),
}

impl CredentialSource {
    /// Resolve the source into a concrete credential set. Custom values win
    /// only when the user asked for them; otherwise the environment is read
    /// fresh at submit time.
    pub fn resolve(&self) -> Credentials {
        match self {
            CredentialSource::Environment => Credentials::from_env(),
            CredentialSource::UserSupplied(creds) => creds.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_supplied_ignores_environment() {
        let typed = Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        };
        let resolved = CredentialSource::UserSupplied(typed.clone()).resolve();
        assert_eq!(resolved, typed);
    }

    #[test]
    fn test_environment_source_reads_env_vars() {
        std::env::set_var("CONSUMER_KEY", "env-ck");
        std::env::set_var("CONSUMER_SECRET", "env-cs");
        std::env::set_var("ACCESS_TOKEN", "env-at");
        std::env::set_var("ACCESS_TOKEN_SECRET", "env-ats");

        let resolved = CredentialSource::Environment.resolve();
        assert_eq!(resolved.consumer_key, "env-ck");
        assert_eq!(resolved.consumer_secret, "env-cs");
        assert_eq!(resolved.access_token, "env-at");
        assert_eq!(resolved.access_token_secret, "env-ats");
        assert!(!resolved.is_empty());

        std::env::remove_var("CONSUMER_KEY");
        std::env::remove_var("CONSUMER_SECRET");
        std::env::remove_var("ACCESS_TOKEN");
        std::env::remove_var("ACCESS_TOKEN_SECRET");
    }

    #[test]
    fn test_default_credentials_are_empty() {
        assert!(Credentials::default().is_empty());
        let partial = Credentials {
            consumer_key: "ck".into(),
            ..Default::default()
        };
        assert!(!partial.is_empty());
    }
}
