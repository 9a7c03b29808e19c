//! Caller identity supplied by the embedding web stack

use crate::error::{AppError, Result};
use uuid::Uuid;

/// The authenticated (or anonymous) identity behind a request.
///
/// Every write path consults this; an anonymous caller is turned away with
/// [`AppError::Unauthenticated`] before any record is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Viewer::Anonymous)
    }

    /// The caller's user id, or `Unauthenticated` carrying `next`, the
    /// destination to return to after login.
    pub fn require_user(&self, next: impl Into<String>) -> Result<Uuid> {
        match self {
            Viewer::User(id) => Ok(*id),
            Viewer::Anonymous => Err(AppError::Unauthenticated { next: next.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_rejected_with_next() {
        let err = Viewer::Anonymous.require_user("/new/").unwrap_err();
        match err {
            AppError::Unauthenticated { next } => assert_eq!(next, "/new/"),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[test]
    fn signed_in_user_passes_through() {
        let id = Uuid::new_v4();
        assert_eq!(Viewer::User(id).require_user("/new/").unwrap(), id);
        assert_eq!(Viewer::User(id).user_id(), Some(id));
        assert!(Viewer::Anonymous.is_anonymous());
    }
}
