//! Safe protocol plumbing used when building transfers out of a Safe: network
//! configuration, contract bindings, call-data builders and the request shape
//! handed to the multisig transaction queue.

pub mod calls;
pub mod consts;
pub mod contracts;
pub mod error;
pub mod transaction_data;
pub mod utils;

pub use error::{Error, Result};
