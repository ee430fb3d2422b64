use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Domain failures raised by the allow/block reconciler.
///
/// None of these leave the ACL state modified; callers surface the message
/// to the user and carry on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// The username is on the block list and cannot be allowed until unblocked.
    #[error("user already blocked; unblock first: {username}")]
    Conflict { username: String },
    /// Empty after trimming, or contains the field delimiter.
    #[error("invalid username {username:?}: must be non-empty and must not contain ','")]
    InvalidUsername { username: String },
}

impl AclError {
    pub fn username(&self) -> &str {
        match self {
            AclError::Conflict { username } | AclError::InvalidUsername { username } => username,
        }
    }
}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_tells_user_to_unblock() {
        let e = AclError::Conflict { username: "carol".into() };
        assert_eq!(e.to_string(), "user already blocked; unblock first: carol");
        assert_eq!(e.username(), "carol");
    }

    #[test]
    fn with_ctx_prefixes_source() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_ctx(|| "read acl.form".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "read acl.form: gone");
    }
}
