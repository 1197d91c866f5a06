//! Registration and login orchestration for Usuario accounts.

use std::sync::Arc;

use tracing::error;

use super::ports::{CredentialHasher, UsuarioPersistenceError, UsuarioRepository};
use super::{DomainError, Email, NuevoUsuario, Usuario};

/// Single message for every failed credential check. Unknown email and
/// wrong password must be indistinguishable to avoid account enumeration.
const CREDENCIALES_INVALIDAS: &str = "Credenciales inválidas";

/// Registration input carrying the plaintext password; hashing happens
/// inside the service, after the duplicate-email check.
#[derive(Debug, Clone)]
pub struct RegistroUsuario {
    pub nombre: String,
    pub apellido: String,
    pub email: Email,
    pub password: String,
}

/// Use-case service for Usuario registration and authentication.
pub struct UsuarioService {
    repo: Arc<dyn UsuarioRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UsuarioService {
    /// Wire the service to its store and hasher ports.
    pub fn new(repo: Arc<dyn UsuarioRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Register a new account.
    ///
    /// Rejects a duplicate email with Conflict before any hashing work. A
    /// concurrent insert racing past this check is caught again by the
    /// store's uniqueness constraint and mapped to the same Conflict.
    pub async fn registrar(&self, datos: RegistroUsuario) -> Result<Usuario, DomainError> {
        let existing = self
            .repo
            .find_by_email(&datos.email)
            .await
            .map_err(|err| internal("registrar_usuario", &err))?;
        if existing.is_some() {
            return Err(DomainError::conflict("El email ya está registrado"));
        }

        let password = self
            .hasher
            .hash(&datos.password)
            .map_err(|err| internal("registrar_usuario", &err))?;

        let nuevo = NuevoUsuario {
            nombre: datos.nombre,
            apellido: datos.apellido,
            email: datos.email,
            password,
        };
        match self.repo.insert(nuevo).await {
            Ok(usuario) => Ok(usuario),
            Err(UsuarioPersistenceError::DuplicateEmail { .. }) => {
                Err(DomainError::conflict("El email ya está registrado"))
            }
            Err(err) => Err(internal("registrar_usuario", &err)),
        }
    }

    /// Authenticate by email and password, returning the full profile.
    pub async fn login(&self, email: &Email, password: &str) -> Result<Usuario, DomainError> {
        let usuario = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|err| internal("login_usuario", &err))?;
        let Some(usuario) = usuario else {
            return Err(DomainError::unauthorized(CREDENCIALES_INVALIDAS));
        };

        let matches = self
            .hasher
            .verify(password, &usuario.password)
            .map_err(|err| internal("login_usuario", &err))?;
        if !matches {
            return Err(DomainError::unauthorized(CREDENCIALES_INVALIDAS));
        }
        Ok(usuario)
    }
}

/// Log the failure with its operation context and hand the caller a
/// generic error; detail never reaches the response body.
fn internal(operation: &'static str, err: &dyn std::error::Error) -> DomainError {
    error!(error = %err, operation, "unexpected failure");
    DomainError::internal("Error interno")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CredentialHashError;
    use crate::domain::{EntityId, ErrorCode, PasswordHash};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryUsuarios {
        store: Mutex<HashMap<String, Usuario>>,
    }

    #[async_trait::async_trait]
    impl UsuarioRepository for InMemoryUsuarios {
        async fn insert(&self, nuevo: NuevoUsuario) -> Result<Usuario, UsuarioPersistenceError> {
            let mut guard = self.store.lock().expect("store poisoned");
            if guard.contains_key(nuevo.email.as_str()) {
                return Err(UsuarioPersistenceError::duplicate_email(
                    nuevo.email.as_str(),
                ));
            }
            let usuario = Usuario {
                id: EntityId::new(format!("u-{}", guard.len() + 1)).expect("id"),
                nombre: nuevo.nombre,
                apellido: nuevo.apellido,
                email: nuevo.email,
                password: nuevo.password,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            guard.insert(usuario.email.as_str().to_owned(), usuario.clone());
            Ok(usuario)
        }

        async fn find_by_email(
            &self,
            email: &Email,
        ) -> Result<Option<Usuario>, UsuarioPersistenceError> {
            let guard = self.store.lock().expect("store poisoned");
            Ok(guard.get(email.as_str()).cloned())
        }
    }

    /// Reversible fake: "digest::<plain>"; avoids bcrypt cost in unit tests.
    struct FakeHasher;

    impl CredentialHasher for FakeHasher {
        fn hash(&self, plain: &str) -> Result<PasswordHash, CredentialHashError> {
            Ok(PasswordHash::from_digest(format!("digest::{plain}")))
        }

        fn verify(&self, plain: &str, digest: &PasswordHash) -> Result<bool, CredentialHashError> {
            Ok(digest.as_str() == format!("digest::{plain}"))
        }
    }

    fn service() -> UsuarioService {
        UsuarioService::new(Arc::new(InMemoryUsuarios::default()), Arc::new(FakeHasher))
    }

    fn registro(email: &str) -> RegistroUsuario {
        RegistroUsuario {
            nombre: "Juan".into(),
            apellido: "Perez".into(),
            email: Email::new(email).expect("valid email"),
            password: "Secret123".into(),
        }
    }

    #[tokio::test]
    async fn registrar_hashes_password() {
        let service = service();
        let usuario = service
            .registrar(registro("juan@example.com"))
            .await
            .expect("registered");
        assert_eq!(usuario.password.as_str(), "digest::Secret123");
        assert_eq!(usuario.email.as_str(), "juan@example.com");
    }

    #[tokio::test]
    async fn registrar_rejects_duplicate_email() {
        let service = service();
        service
            .registrar(registro("juan@example.com"))
            .await
            .expect("first registration");
        let err = service
            .registrar(registro("juan@example.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "El email ya está registrado");
    }

    #[tokio::test]
    async fn login_returns_profile_on_match() {
        let service = service();
        service
            .registrar(registro("juan@example.com"))
            .await
            .expect("registered");
        let email = Email::new("juan@example.com").expect("valid email");
        let usuario = service
            .login(&email, "Secret123")
            .await
            .expect("authenticated");
        assert_eq!(usuario.nombre, "Juan");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let service = service();
        service
            .registrar(registro("juan@example.com"))
            .await
            .expect("registered");

        let known = Email::new("juan@example.com").expect("valid email");
        let wrong_password = service
            .login(&known, "incorrect")
            .await
            .expect_err("wrong password");

        let unknown = Email::new("nadie@example.com").expect("valid email");
        let unknown_user = service
            .login(&unknown, "Secret123")
            .await
            .expect_err("unknown email");

        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message(), "Credenciales inválidas");
    }
}
