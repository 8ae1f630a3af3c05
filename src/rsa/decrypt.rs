// RSA Decryption
// Textbook (unpadded) RSA: m = c^d mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPrivateKey;

/// Decode a ciphertext with the private key
pub fn decode(cipher: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaBigInt {
    mod_pow(cipher, private_key.d(), private_key.n())
}
