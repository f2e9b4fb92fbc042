//! # eosio-sdk
//!
//! Build, link, sign and push EOSIO transactions.
//!
//! A transaction moves through three states. [`Transaction`] holds actions
//! and limits. Linking it to a [`Net`] fixes chain id, TAPOS reference and
//! expiration, giving a [`LinkedTransaction`] that can be serialized. Signing
//! yields a [`SignedTransaction`] ready to send.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use eosio_abi::{AbiString, Name};
//! use eosio_crypto::PrivateKey;
//! use eosio_sdk::{Action, Authorization, Data, MockNet, Net, Transaction};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), eosio_sdk::SdkError> {
//! let net: Arc<dyn Net> = Arc::new(MockNet::new());
//! let action = Action::new(
//!     "user2",
//!     "sendmsg",
//!     vec![Authorization::new("user2", "active")?],
//!     vec![
//!         Data::new("from", Name::new("user2")?),
//!         Data::new("message", AbiString::new("hello")?),
//!     ],
//! )?;
//!
//! let key: PrivateKey = "5K5UHY2LjHw2QQFJKCd2PdF7hxPJnknMfQLhxbEguJJttr1DFdp".parse()?;
//! let signed = Transaction::new(vec![action])?
//!     .delay_sec(0)
//!     .link(net)
//!     .await?
//!     .sign(&key)?;
//! let receipt = signed.send().await?;
//! # let _ = receipt;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod action;
mod config;
mod error;
mod net;
mod transaction;
mod types;

pub use action::{Action, Authorization, Data, LinkedAction, MAX_AUTHORIZATIONS};
pub use config::NetConfig;
pub use error::SdkError;
#[cfg(feature = "http")]
pub use net::HttpNet;
pub use net::{
    deserialize_response, MockNet, Net, LOCAL_URL, MOCK_CHAIN_ID, MOCK_LIB_ID, WAX_MAINNET_URL,
    WAX_TESTNET_URL,
};
pub use transaction::{
    LinkedTransaction, SignedTransaction, Transaction, DEFAULT_EXPIRATION_DELAY_SEC, MAX_ACTIONS,
    MAX_SIGNATURES,
};
pub use types::{ChainInfo, PushTransactionRequest, TaposRef};

// Re-export the crates the public API is expressed in
pub use eosio_abi;
pub use eosio_crypto;
pub use eosio_primitives;
