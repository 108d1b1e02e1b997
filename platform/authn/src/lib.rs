//! Platform authentication helpers.
//!
//! A single login gate: a fixed credential list checked in memory and the
//! signed-in user persisted in a key-value slot so the session survives
//! between invocations. There is no authorization model beyond "signed in".

use chrono::{DateTime, Utc};
use platform_db::{DbError, KvSlot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Slot key holding the signed-in user.
pub const SESSION_KEY: &str = "currentUser";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Slot(#[from] DbError),
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type AuthnResult<T> = Result<T, AuthnError>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

impl Credential {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub session_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AuthnService {
    credentials: Vec<Credential>,
}

impl Default for AuthnService {
    /// The two demo accounts.
    fn default() -> Self {
        Self::empty()
            .with_credential(Credential::new(
                "admin@empresa.com",
                "admin123",
                "Administrador",
                "admin",
            ))
            .with_credential(Credential::new(
                "lider@empresa.com",
                "lider123",
                "Líder de Equipo",
                "leader",
            ))
    }
}

impl AuthnService {
    pub fn empty() -> Self {
        Self {
            credentials: Vec::new(),
        }
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials.push(credential);
        self
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn authenticate(&self, email: &str, password: &str) -> AuthnResult<SessionUser> {
        validate_login(email, password)?;
        let wanted = email.trim().to_lowercase();
        let credential = self
            .credentials
            .iter()
            .find(|cred| cred.email.to_lowercase() == wanted && cred.password == password)
            .ok_or(AuthnError::InvalidCredentials)?;
        Ok(SessionUser {
            session_id: Uuid::new_v4(),
            email: credential.email.clone(),
            name: credential.name.clone(),
            role: credential.role.clone(),
            signed_in_at: Utc::now(),
        })
    }
}

/// Login form rules: email present and shaped like `x@y.z`, password present
/// and at least six characters.
pub fn validate_login(email: &str, password: &str) -> AuthnResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthnError::InvalidInput("email is required".into()));
    }
    if !looks_like_email(email) {
        return Err(AuthnError::InvalidInput("email is not valid".into()));
    }
    if password.is_empty() {
        return Err(AuthnError::InvalidInput("password is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthnError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Some non-blank text, an `@`, more text, a `.`, more text.
pub fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|word| {
        word.char_indices().any(|(at, c)| {
            c == '@' && at > 0 && {
                let domain = &word[at + 1..];
                domain
                    .char_indices()
                    .any(|(dot, d)| d == '.' && dot > 0 && dot + 1 < domain.len())
            }
        })
    })
}

/// The signed-in user, mirrored to [`SESSION_KEY`].
pub struct SessionStore<S> {
    slot: S,
}

impl<S: KvSlot> SessionStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn login(
        &mut self,
        authn: &AuthnService,
        email: &str,
        password: &str,
    ) -> AuthnResult<SessionUser> {
        let user = match authn.authenticate(email, password) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "login rejected");
                return Err(err);
            }
        };
        self.slot
            .write(SESSION_KEY, &serde_json::to_string(&user)?)?;
        info!(email = %user.email, session = %user.session_id, "signed in");
        Ok(user)
    }

    pub fn logout(&mut self) -> AuthnResult<()> {
        self.slot.remove(SESSION_KEY)?;
        info!("signed out");
        Ok(())
    }

    /// A stored session that no longer parses counts as signed out.
    pub fn current(&self) -> AuthnResult<Option<SessionUser>> {
        let Some(raw) = self.slot.read(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session");
                Ok(None)
            }
        }
    }

    pub fn require(&self) -> AuthnResult<SessionUser> {
        self.current()?.ok_or(AuthnError::NotSignedIn)
    }

    pub fn into_slot(self) -> S {
        self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_db::MemorySlot;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("admin@empresa.com"));
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("admin"));
        assert!(!looks_like_email("admin@empresa"));
        assert!(!looks_like_email("@empresa.com"));
        assert!(!looks_like_email("admin@.com"));
        assert!(!looks_like_email("admin@empresa."));
    }

    #[test]
    fn login_form_rules() {
        assert!(matches!(validate_login("", "secret1"), Err(AuthnError::InvalidInput(_))));
        assert!(matches!(validate_login("nope", "secret1"), Err(AuthnError::InvalidInput(_))));
        assert!(matches!(validate_login("a@b.co", ""), Err(AuthnError::InvalidInput(_))));
        assert!(matches!(validate_login("a@b.co", "12345"), Err(AuthnError::InvalidInput(_))));
        assert!(validate_login("a@b.co", "123456").is_ok());
    }

    #[test]
    fn demo_accounts_authenticate() {
        let authn = AuthnService::default();
        let admin = authn.authenticate("Admin@Empresa.com ", "admin123").unwrap();
        assert_eq!(admin.name, "Administrador");
        assert_eq!(admin.role, "admin");
        let lead = authn.authenticate("lider@empresa.com", "lider123").unwrap();
        assert_eq!(lead.role, "leader");
        assert!(matches!(
            authn.authenticate("lider@empresa.com", "admin123"),
            Err(AuthnError::InvalidCredentials)
        ));
    }

    #[test]
    fn session_round_trip() {
        let authn = AuthnService::default();
        let mut sessions = SessionStore::new(MemorySlot::new());
        assert!(matches!(sessions.require(), Err(AuthnError::NotSignedIn)));

        let user = sessions.login(&authn, "admin@empresa.com", "admin123").unwrap();
        assert_eq!(sessions.require().unwrap(), user);

        sessions.logout().unwrap();
        assert_eq!(sessions.current().unwrap(), None);
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let authn = AuthnService::default();
        let mut sessions = SessionStore::new(MemorySlot::new());
        let user = sessions.login(&authn, "lider@empresa.com", "lider123").unwrap();
        assert!(sessions.login(&authn, "lider@empresa.com", "wrongpass").is_err());
        assert_eq!(sessions.current().unwrap(), Some(user));
    }

    #[test]
    fn corrupt_session_counts_as_signed_out() {
        let mut slot = MemorySlot::new();
        slot.write(SESSION_KEY, "garbage").unwrap();
        let sessions = SessionStore::new(slot);
        assert_eq!(sessions.current().unwrap(), None);
    }
}
