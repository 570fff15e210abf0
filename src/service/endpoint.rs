// Sui-Lite Binder: Transaction Endpoint
//
// The service object registered under `sui_lite_binder`. It answers two
// raw transactions (no interface definition layer):
//
//   1 (PING)      → no-exception, "sui-lite-alive"
//   2 (GET_INFO)  → no-exception, uid, pid, security label, service name
//
// Any other code is left to the transport's "unknown transaction" default.
// The endpoint holds no mutable state; every reply is computed from the live
// process identity at call time, so concurrent calls are independent.

use std::sync::Arc;

use crate::binder::{Binder, Parcel, ParcelError, Reply};

use super::identity::IdentityProvider;

/// Name under which the endpoint registers itself.
pub const SERVICE_NAME: &str = "sui_lite_binder";

/// Label the endpoint reports in transport logs. The raw transaction
/// protocol has no interface token, so this is just the service name.
pub const DESCRIPTOR: &str = SERVICE_NAME;

/// Fixed PING response body.
pub const PING_RESPONSE: &str = "sui-lite-alive";

pub const TRANSACTION_PING: u32 = 1;
pub const TRANSACTION_GET_INFO: u32 = 2;

/// Decoded operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ping,
    GetInfo,
    Unrecognized(u32),
}

impl Operation {
    pub fn from_code(code: u32) -> Self {
        match code {
            TRANSACTION_PING => Operation::Ping,
            TRANSACTION_GET_INFO => Operation::GetInfo,
            other => Operation::Unrecognized(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Operation::Ping => TRANSACTION_PING,
            Operation::GetInfo => TRANSACTION_GET_INFO,
            Operation::Unrecognized(code) => *code,
        }
    }
}

/// Fields of a GET_INFO reply, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub uid: u32,
    pub pid: u32,
    pub security_label: String,
    pub service_name: String,
}

impl ServiceInfo {
    /// Append the reply body (without exception header).
    pub fn write_to(&self, parcel: &mut Parcel) {
        parcel.write_u32(self.uid);
        parcel.write_u32(self.pid);
        parcel.write_str(&self.security_label);
        parcel.write_str(&self.service_name);
    }

    /// Decode a full GET_INFO reply, exception header included.
    pub fn read_reply(parcel: &mut Parcel) -> Result<Self, ParcelError> {
        parcel.read_exception()?;
        Ok(Self {
            uid: parcel.read_u32()?,
            pid: parcel.read_u32()?,
            security_label: parcel.read_str()?,
            service_name: parcel.read_str()?,
        })
    }
}

/// Decode a full PING reply, exception header included.
pub fn read_ping_reply(parcel: &mut Parcel) -> Result<String, ParcelError> {
    parcel.read_exception()?;
    parcel.read_str()
}

/// Stateless IPC endpoint answering PING and GET_INFO.
pub struct TransactionEndpoint {
    identity: Arc<dyn IdentityProvider>,
}

impl TransactionEndpoint {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Handle one call. The input payload is not inspected by any operation.
    pub fn handle(&self, code: u32, _input: &Parcel) -> Reply {
        match Operation::from_code(code) {
            Operation::Ping => Reply::Handled(self.ping()),
            Operation::GetInfo => Reply::Handled(self.get_info()),
            Operation::Unrecognized(code) => {
                tracing::warn!(code, "Unknown transaction code: {}", code);
                Reply::Unhandled
            }
        }
    }

    fn ping(&self) -> Parcel {
        let mut reply = Parcel::new();
        reply.write_no_exception();
        reply.write_str(PING_RESPONSE);
        tracing::info!("PING received, responded with {}", PING_RESPONSE);
        reply
    }

    fn get_info(&self) -> Parcel {
        let info = ServiceInfo {
            uid: self.identity.current_uid(),
            pid: self.identity.current_pid(),
            security_label: self.identity.current_security_label(),
            service_name: SERVICE_NAME.to_string(),
        };

        let mut reply = Parcel::new();
        reply.write_no_exception();
        info.write_to(&mut reply);

        tracing::info!(
            uid = info.uid,
            pid = info.pid,
            ctx = %info.security_label,
            "GET_INFO: uid={} pid={} ctx={}",
            info.uid,
            info.pid,
            info.security_label
        );
        reply
    }
}

impl Binder for TransactionEndpoint {
    fn descriptor(&self) -> &str {
        DESCRIPTOR
    }

    fn transact(&self, code: u32, data: &Parcel) -> Reply {
        self.handle(code, data)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{capture_logs, FixedIdentity};

    fn endpoint_with(identity: Arc<FixedIdentity>) -> TransactionEndpoint {
        TransactionEndpoint::new(identity)
    }

    fn endpoint() -> TransactionEndpoint {
        endpoint_with(Arc::new(FixedIdentity::new(0, 4242, "u:r:magisk:s0")))
    }

    fn payload(bytes: &[u8]) -> Parcel {
        Parcel::from_bytes(bytes.to_vec())
    }

    #[test]
    fn test_operation_decoding() {
        assert_eq!(Operation::from_code(1), Operation::Ping);
        assert_eq!(Operation::from_code(2), Operation::GetInfo);
        assert_eq!(Operation::from_code(0), Operation::Unrecognized(0));
        assert_eq!(Operation::from_code(3).code(), 3);
        assert_eq!(Operation::GetInfo.code(), TRANSACTION_GET_INFO);
    }

    #[test]
    fn test_ping_returns_fixed_string() {
        let reply = endpoint().handle(TRANSACTION_PING, &Parcel::new());
        let mut parcel = reply.into_parcel().expect("PING must be handled");
        assert_eq!(read_ping_reply(&mut parcel).unwrap(), PING_RESPONSE);
        assert_eq!(parcel.remaining(), 0);
    }

    #[test]
    fn test_ping_is_idempotent() {
        let endpoint = endpoint();
        let first = endpoint.handle(TRANSACTION_PING, &Parcel::new());
        let second = endpoint.handle(TRANSACTION_PING, &Parcel::new());
        assert_eq!(
            first.into_parcel().unwrap().as_bytes(),
            second.into_parcel().unwrap().as_bytes()
        );
    }

    #[test]
    fn test_get_info_reports_identity_and_name() {
        let reply = endpoint().handle(TRANSACTION_GET_INFO, &Parcel::new());
        let mut parcel = reply.into_parcel().expect("GET_INFO must be handled");
        let info = ServiceInfo::read_reply(&mut parcel).unwrap();
        assert_eq!(
            info,
            ServiceInfo {
                uid: 0,
                pid: 4242,
                security_label: "u:r:magisk:s0".to_string(),
                service_name: SERVICE_NAME.to_string(),
            }
        );
        assert_eq!(parcel.remaining(), 0);
    }

    #[test]
    fn test_get_info_rereads_label_each_call() {
        let identity = Arc::new(FixedIdentity::new(1000, 1, "u:r:shell:s0"));
        let endpoint = endpoint_with(identity.clone());
        endpoint.handle(TRANSACTION_GET_INFO, &Parcel::new());
        endpoint.handle(TRANSACTION_GET_INFO, &Parcel::new());
        assert_eq!(identity.label_reads(), 2);
    }

    #[test]
    fn test_ping_does_not_read_identity() {
        let identity = Arc::new(FixedIdentity::new(1000, 1, "u:r:shell:s0"));
        let endpoint = endpoint_with(identity.clone());
        endpoint.handle(TRANSACTION_PING, &Parcel::new());
        assert_eq!(identity.label_reads(), 0);
    }

    #[test]
    fn test_input_payload_is_ignored() {
        let endpoint = endpoint();
        let inputs = [
            payload(&[]),
            payload(&[0xff; 3]),
            payload(b"arbitrary bytes that are not a parcel"),
        ];

        let baseline_ping = endpoint.handle(TRANSACTION_PING, &Parcel::new());
        let baseline_info = endpoint.handle(TRANSACTION_GET_INFO, &Parcel::new());
        let baseline_ping = baseline_ping.into_parcel().unwrap();
        let baseline_info = baseline_info.into_parcel().unwrap();

        for input in &inputs {
            let ping = endpoint.handle(TRANSACTION_PING, input).into_parcel().unwrap();
            let info = endpoint
                .handle(TRANSACTION_GET_INFO, input)
                .into_parcel()
                .unwrap();
            assert_eq!(ping.as_bytes(), baseline_ping.as_bytes());
            assert_eq!(info.as_bytes(), baseline_info.as_bytes());
        }
    }

    #[test]
    fn test_unrecognized_codes_are_unhandled() {
        let endpoint = endpoint();
        for code in [0, 3, 4, 42, 0x5f504e47, u32::MAX] {
            let reply = endpoint.handle(code, &payload(b"junk"));
            assert!(!reply.is_handled(), "code {} must not be handled", code);
        }
    }

    #[test]
    fn test_binder_descriptor_and_transact() {
        let endpoint = endpoint();
        let binder: &dyn Binder = &endpoint;
        assert_eq!(binder.descriptor(), DESCRIPTOR);
        assert_eq!(binder.descriptor(), SERVICE_NAME);
        assert!(binder.transact(TRANSACTION_PING, &Parcel::new()).is_handled());
        assert!(!binder.transact(9, &Parcel::new()).is_handled());
    }

    #[test]
    fn test_calls_are_logged() {
        let endpoint = endpoint();
        let (_, logs) = capture_logs(|| {
            endpoint.handle(TRANSACTION_PING, &Parcel::new());
            endpoint.handle(TRANSACTION_GET_INFO, &Parcel::new());
            endpoint.handle(77, &Parcel::new());
        });

        assert!(logs.contains("PING received, responded with sui-lite-alive"));
        assert!(logs.contains("GET_INFO: uid=0 pid=4242 ctx=u:r:magisk:s0"));
        assert!(logs.contains("Unknown transaction code: 77"));
    }

    #[test]
    fn test_concurrent_calls_are_independent() {
        let endpoint = Arc::new(endpoint());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let endpoint = endpoint.clone();
                std::thread::spawn(move || {
                    let code = if i % 2 == 0 {
                        TRANSACTION_PING
                    } else {
                        TRANSACTION_GET_INFO
                    };
                    (0..50)
                        .all(|_| endpoint.handle(code, &Parcel::new()).is_handled())
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
