use std::sync::RwLock;

/// Which bearer token a request is sent with. The backend issues a separate
/// token per role; storefront calls use the customer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Seller,
    Admin,
}

#[derive(Debug, Default)]
struct Tokens {
    customer: Option<String>,
    seller: Option<String>,
    admin: Option<String>,
}

/// Owned replacement for the browser-storage token stash: the UI layer holds
/// one `SessionStore` and shares it with the gateway.
///
/// An unauthorized response clears every role at once; the backend treats an
/// expired session as invalid across roles.
#[derive(Debug, Default)]
pub struct SessionStore {
    tokens: RwLock<Tokens>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, role: Role, token: impl Into<String>) {
        if let Ok(mut tokens) = self.tokens.write() {
            let slot = match role {
                Role::Customer => &mut tokens.customer,
                Role::Seller => &mut tokens.seller,
                Role::Admin => &mut tokens.admin,
            };
            *slot = Some(token.into());
        }
    }

    pub fn token(&self, role: Role) -> Option<String> {
        let tokens = self.tokens.read().ok()?;
        match role {
            Role::Customer => tokens.customer.clone(),
            Role::Seller => tokens.seller.clone(),
            Role::Admin => tokens.admin.clone(),
        }
    }

    /// Drops all tokens; the caller must send the user back through login.
    pub fn clear_all(&self) {
        if let Ok(mut tokens) = self.tokens.write() {
            *tokens = Tokens::default();
        }
    }

    pub fn is_authenticated(&self, role: Role) -> bool {
        self.token(role).is_some()
    }
}

/// Picks the role whose token authenticates a request to `path`, mirroring
/// the backend's URL namespacing.
pub fn role_for_path(path: &str) -> Role {
    if path.starts_with("/admin/") {
        Role::Admin
    } else if path.starts_with("/seller/") {
        Role::Seller
    } else {
        Role::Customer
    }
}
