//! Object-level authorization for photos.
//!
//! Authentication is enforced earlier by the [`AuthUser`](crate::extractors::auth::AuthUser)
//! extractor, so anonymous writes never reach [`authorize`] through the HTTP surface.
//! The policy still treats an anonymous requester as non-elevated and denies the write.

use axum::http::Method;
use uuid::Uuid;

use crate::error::AppError;

/// Whether a request only reads state or may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    Read,
    Write,
}

impl MethodClass {
    pub fn of(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
            MethodClass::Read
        } else {
            MethodClass::Write
        }
    }
}

/// The identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: Uuid,
    /// Staff identities bypass ownership checks.
    pub elevated: bool,
}

/// Everything the policy needs to reach a decision.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest {
    pub method: MethodClass,
    /// Owner of the target photo, `None` for system/seed photos.
    pub owner: Option<Uuid>,
    pub requester: Option<Requester>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::PermissionDenied),
        }
    }
}

pub fn authorize(request: &AccessRequest) -> Decision {
    if request.method == MethodClass::Read {
        return Decision::Allow;
    }

    let Some(requester) = request.requester else {
        return Decision::Deny;
    };

    if requester.elevated {
        return Decision::Allow;
    }

    match request.owner {
        Some(owner) if owner == requester.user_id => Decision::Allow,
        _ => Decision::Deny,
    }
}
