//! Review and submission of a pending fund transfer out of a Safe.
//!
//! The review runs as a small pipeline: the requested token is resolved against the
//! tokens held by the Safe, the transfer is encoded into a call target and payload, the
//! fee estimator prices that call, the operator may override fee and nonce parameters,
//! and finally the transfer is dispatched either to the multisig transaction queue or,
//! for spending-limit transfers, straight to the allowance module.

pub mod bindings;
pub mod dispatcher;
pub mod encoder;
pub mod error;
pub mod estimator;
pub mod parameters;
pub mod request;
pub mod review;
pub mod rpc;
pub mod token;

pub use error::ReviewError;
pub use review::{ReviewCallbacks, ReviewSendFunds, ReviewSummary, SafeContext};
