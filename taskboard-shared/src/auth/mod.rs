/// Authentication and credential storage
///
/// # Modules
///
/// - [`token`]: bearer-token authorization capability
/// - [`password`]: credential encoders used when users are stored

pub mod password;
pub mod token;
