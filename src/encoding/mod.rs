//! Encoding utilities for Safe creation transactions

mod creation;

pub use creation::{
    encode_create_proxy_call, encode_safe_creation_tx, encode_setup_call, SafeCreationTx,
};
