use crate::AccountId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("network prefix {0} is out of range")]
    InvalidPrefix(u16),

    #[error("network prefix {0} is reserved")]
    ReservedPrefix(u16),
}

/// Turns a raw account id into a human-readable address for a given network.
pub trait AddressEncoder {
    fn encode(&self, account_id: &AccountId, network_prefix: u16) -> Result<String, EncodeError>;
}

impl<E: AddressEncoder + ?Sized> AddressEncoder for &E {
    fn encode(&self, account_id: &AccountId, network_prefix: u16) -> Result<String, EncodeError> {
        (**self).encode(account_id, network_prefix)
    }
}
