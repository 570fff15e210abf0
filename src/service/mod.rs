// Sui-Lite Binder: Service Module
//
// The diagnostic endpoint and the process identity it reports.

mod endpoint;
mod identity;

pub use endpoint::{
    read_ping_reply, Operation, ServiceInfo, TransactionEndpoint, DESCRIPTOR, PING_RESPONSE,
    SERVICE_NAME, TRANSACTION_GET_INFO, TRANSACTION_PING,
};
pub use identity::{
    read_security_label, IdentityProvider, ProcessIdentity, SystemIdentity, DEFAULT_ATTR_PATH,
    UNKNOWN_LABEL,
};
