use lootledger_auth::Identity;

/// Authenticated identity attached to each request by the auth middleware.
///
/// Presence of this context means the session token verified; it says
/// nothing about admin-ness, which the services check per mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: Identity,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
