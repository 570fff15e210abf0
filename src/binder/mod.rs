// Sui-Lite Binder: Binder Object Model
//
// The transaction-level contract between the transport and a service
// object. A service receives an operation code plus a request parcel and
// either answers with a reply parcel or leaves the call to the transport's
// default "unknown transaction" handling.

mod error;
mod parcel;

pub use error::ParcelError;
pub use parcel::{Parcel, EX_NONE};

/// Outcome of a single transaction as seen by the transport.
#[derive(Debug, Clone)]
pub enum Reply {
    /// The service recognized the call and produced a reply payload.
    Handled(Parcel),
    /// The service does not implement this code; the transport answers
    /// with its default rejection.
    Unhandled,
}

impl Reply {
    pub fn is_handled(&self) -> bool {
        matches!(self, Reply::Handled(_))
    }

    /// Take the reply payload, if the call was handled.
    pub fn into_parcel(self) -> Option<Parcel> {
        match self {
            Reply::Handled(parcel) => Some(parcel),
            Reply::Unhandled => None,
        }
    }
}

/// A service object reachable through the transport.
///
/// Implementations must tolerate concurrent, re-entrant calls: the transport
/// may deliver transactions from several worker threads at once.
pub trait Binder: Send + Sync {
    /// Interface descriptor, used in logs.
    fn descriptor(&self) -> &str;

    /// Handle one transaction.
    fn transact(&self, code: u32, data: &Parcel) -> Reply;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
