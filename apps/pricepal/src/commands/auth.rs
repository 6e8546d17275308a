//! # Auth Commands
//!
//! Registration, login and password reset.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  register("owner@shop.com", "secret1", "Corner Store")                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate email / password (≥ 6) / shop name ──► ValidationError       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  accounts.create() ─────────────────────────────► EmailInUse           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users/{uid} = { email, shopName }                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory cache cleared, session = { uid, email }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricepal_core::validation::{validate_email, validate_password, validate_shop_name};
use pricepal_core::{UserProfile, ValidationError, USERS_COLLECTION};
use pricepal_db::{Account, Database, Document};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::state::{InventoryState, Session, SessionState};

impl From<Account> for Session {
    fn from(account: Account) -> Self {
        Session {
            uid: account.uid,
            email: account.email,
        }
    }
}

/// Creates an account with its profile and logs it in.
pub async fn register(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
    email: &str,
    password: &str,
    shop_name: &str,
) -> ApiResult<Session> {
    let email = validate_email(email)?;
    validate_password(password)?;
    let shop_name = validate_shop_name(shop_name)?;

    let account = db.accounts().create(&email, password).await?;

    let profile = UserProfile {
        email: account.email.clone(),
        shop_name,
    };
    let fields: Document = profile
        .to_fields()
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect();

    if let Err(e) = db
        .documents()
        .set_fields(USERS_COLLECTION, &account.uid, &fields)
        .await
    {
        warn!(uid = %account.uid, error = %e, "Failed to write user profile");
        return Err(e.into());
    }

    info!(uid = %account.uid, shop = %profile.shop_name, "User registered");

    Ok(sign_in(session, inventory, account).await)
}

/// Logs in with email and password.
pub async fn login(
    db: &Database,
    session: &SessionState,
    inventory: &InventoryState,
    email: &str,
    password: &str,
) -> ApiResult<Session> {
    let email = validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".into(),
        }
        .into());
    }

    let account = db.accounts().authenticate(&email, password).await?;
    info!(uid = %account.uid, "User logged in");

    Ok(sign_in(session, inventory, account).await)
}

/// Makes `account` the current user.
///
/// The inventory cache belongs to whoever was logged in before, so it is
/// dropped before the new session becomes visible.
async fn sign_in(session: &SessionState, inventory: &InventoryState, account: Account) -> Session {
    inventory.clear().await;

    let current = Session::from(account);
    if let Some(previous) = session.set(current.clone()).await {
        if previous.uid != current.uid {
            debug!(from = %previous.uid, to = %current.uid, "Switched accounts");
        }
    }
    current
}

/// Ends the session and forgets the inventory screen's data.
pub async fn logout(session: &SessionState, inventory: &InventoryState) {
    if let Some(previous) = session.clear().await {
        info!(uid = %previous.uid, "User logged out");
    }
    inventory.clear().await;
}

/// Issues a password reset token for `email`.
///
/// Delivering the token is the mail relay's job; here it is only logged.
pub async fn send_password_reset(db: &Database, email: &str) -> ApiResult<()> {
    let email = validate_email(email)?;
    let token = db.accounts().create_reset_token(&email).await?;

    info!(email = %email, token = %token, "Password reset token issued");
    Ok(())
}
