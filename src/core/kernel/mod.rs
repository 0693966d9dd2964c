/// Transport kernel - the cross-cutting mechanics shared by every call.
///
/// The kernel is organized around three components:
///
/// - `signer`: deterministic request authentication. Canonical payloads are
///   signed with HMAC-SHA256 (system-generated keys) or RSA-SHA256
///   (self-generated keys).
/// - `rest`: the HTTP request pipeline - URL resolution, canonical payload
///   construction, signature headers, dispatch, and uniform error
///   normalization.
/// - `ws` + `codec`: the streaming session - one lazily-created persistent
///   connection, channel subscription handshakes, verbatim inbound dispatch,
///   and automatic recovery from abnormal closure.
///
/// The kernel contains only transport logic; endpoint methods live on the
/// client and delegate here.
pub mod codec;
pub mod rest;
pub mod signer;
pub mod ws;

// Re-export key types for convenience
pub use codec::subscribe_frame;
pub use rest::{ErrorHandler, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::sign;
pub use ws::{MessageHandler, StreamSession};
