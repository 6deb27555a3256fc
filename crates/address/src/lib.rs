//! SS58 address encoding.
//!
//! An SS58 address is the base58 encoding of
//! `prefix || account_id || checksum`, where the checksum is the first two
//! bytes of `blake2b_512("SS58PRE" || prefix || account_id)`.

use blake2::{Blake2b512, Digest};

use stakepick_core_types::{AccountId, AddressEncoder, EncodeError};

/// Highest network prefix representable in SS58.
pub const MAX_PREFIX: u16 = 16_383;

const CHECKSUM_PREIMAGE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;

/// Encodes account ids as SS58 addresses.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ss58Encoder;

impl AddressEncoder for Ss58Encoder {
    fn encode(&self, account_id: &AccountId, network_prefix: u16) -> Result<String, EncodeError> {
        encode(account_id, network_prefix)
    }
}

/// Prefix bytes for a network identifier.
///
/// Identifiers below 64 take a single byte, larger ones two bytes with the
/// `0b01` marker in the top bits of the first.
fn prefix_bytes(prefix: u16) -> Result<Vec<u8>, EncodeError> {
    match prefix {
        46 | 47 => Err(EncodeError::ReservedPrefix(prefix)),
        0..=63 => Ok(vec![prefix as u8]),
        64..=MAX_PREFIX => {
            let first = (((prefix & 0b0000_0000_1111_1100) >> 2) as u8) | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first, second])
        }
        _ => Err(EncodeError::InvalidPrefix(prefix)),
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREIMAGE);
    hasher.update(payload);
    let hash = hasher.finalize();

    [hash[0], hash[1]]
}

/// Encode an account id for the given network.
pub fn encode(account_id: &AccountId, network_prefix: u16) -> Result<String, EncodeError> {
    let mut payload = prefix_bytes(network_prefix)?;
    payload.extend_from_slice(account_id.as_bytes());

    let checksum = checksum(&payload);
    payload.extend_from_slice(&checksum);

    Ok(bs58::encode(payload).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Public key of the well-known `//Alice` development account.
    const ALICE: &str = "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    fn alice() -> AccountId {
        AccountId::from_hex(ALICE).unwrap()
    }

    #[test]
    fn known_addresses() {
        let cases = [
            (0, "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5"),
            (2, "HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F"),
            (42, "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
        ];

        for (prefix, expected) in cases {
            assert_eq!(encode(&alice(), prefix).unwrap(), expected, "prefix {prefix}");
        }
    }

    #[test]
    fn two_byte_prefix_layout() {
        let address = encode(&alice(), 1284).unwrap();
        let raw = bs58::decode(&address).into_vec().unwrap();

        assert_eq!(raw.len(), 2 + 32 + CHECKSUM_LEN);
        assert_eq!(raw[0] & 0b1100_0000, 0b0100_0000);
        assert_eq!(&raw[2..34], alice().as_bytes());
        assert_eq!(raw[34..], checksum(&raw[..34]));

        // Reassemble the identifier from its two bytes.
        let lower = (raw[0] << 2) | (raw[1] >> 6);
        let upper = raw[1] & 0b0011_1111;
        assert_eq!(u16::from(lower) | (u16::from(upper) << 8), 1284);
    }

    #[test]
    fn invalid_prefixes() {
        assert_eq!(encode(&alice(), 46), Err(EncodeError::ReservedPrefix(46)));
        assert_eq!(
            encode(&alice(), MAX_PREFIX + 1),
            Err(EncodeError::InvalidPrefix(MAX_PREFIX + 1))
        );
    }

    #[test]
    fn encoder_trait_matches_function() {
        let encoder = Ss58Encoder;
        assert_eq!(
            AddressEncoder::encode(&encoder, &alice(), 0).unwrap(),
            encode(&alice(), 0).unwrap()
        );
    }
}
