/// OAuth2 client-credentials token acquisition.
pub mod credentials;
