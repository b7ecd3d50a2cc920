/// Middleware for the residence server:
/// - `auth`: bearer-token and session guards
/// - `security`: security response headers

pub mod auth;
pub mod security;
