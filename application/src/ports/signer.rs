//! Signer port
//!
//! An opaque signing capability. Key custody is outside this system; the
//! core only needs to hand a signer to the execution capability.

/// Signing capability of one executor
pub trait Signer: Send + Sync {
    /// Address transactions are signed from
    fn address(&self) -> &str;
}

/// Signer that only carries an address, for dry runs and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSigner {
    address: String,
}

impl AddressSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl Signer for AddressSigner {
    fn address(&self) -> &str {
        &self.address
    }
}
