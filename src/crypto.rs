//! Token generation

use uuid::Uuid;

/// Length of every token handed out by the gateway
pub const TOKEN_LENGTH: usize = 32;

/// Generate a random 32-character session token
pub fn generate_session_token() -> String {
    random_hex()
}

/// Generate a random login token identifying one login attempt
pub fn generate_login_token() -> String {
    random_hex()
}

fn random_hex() -> String {
    Uuid::new_v4().simple().to_string()
}
