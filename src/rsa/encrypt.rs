// RSA Encryption
// Textbook (unpadded) RSA: c = m^e mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;

/// Encode a message with the public key
///
/// The message is expected to be below n already; it is not range checked.
pub fn encode(message: &RsaBigInt, public_key: &RsaPublicKey) -> RsaBigInt {
    mod_pow(message, public_key.e(), public_key.n())
}
