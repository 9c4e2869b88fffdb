//! Credentials and request signing for the qTrade REST API
//!
//! Every private request carries two headers:
//!
//! - `Authorization: HMAC-SHA256 <keyID>:<digest>`
//! - `HMAC-Timestamp: <unix seconds>`
//!
//! where the digest is the base64 SHA-256 of the method, request URI,
//! timestamp and (optionally) body, followed by the shared secret.
//!
//! # Example
//!
//! ```
//! use qtrade_auth::{BodySigning, Credentials, RequestSigner};
//!
//! let creds = Credentials::parse("256:vwj043jtrw4o5igw4oi5jwoi45g").unwrap();
//! let signer = RequestSigner::new(&creds, BodySigning::Omit);
//!
//! let envelope = signer.sign_at("GET", "/", 12345, None);
//! assert_eq!(
//!     envelope.authorization,
//!     "HMAC-SHA256 256:iyfC4n+bE+3hLgMJns1Z67FKA7O5qm5PgDvZHGraMTQ="
//! );
//! ```

mod credentials;
mod error;

pub use credentials::{
    unix_timestamp, BodySigning, Credentials, RequestSigner, SignedEnvelope, AUTHORIZATION_HEADER,
    TIMESTAMP_HEADER,
};
pub use error::{AuthError, AuthResult};
