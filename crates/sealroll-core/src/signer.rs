//! Signer: RSASSA-PKCS1-v1_5 over SHA-384.

use std::fmt;

use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer as _};
use sha2::Sha384;

use crate::crypto::{RecordSignature, RSA_KEY_BITS};
use crate::keys::Keypair;

/// Produces signatures over email digests.
///
/// The message is the bytes of the hex digest string itself. The scheme then
/// hashes that message again with SHA-384 internally; the two hash layers are
/// separate and the signature never covers the raw digest bytes.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey<Sha384>,
}

impl Signer {
    /// Create a signer from a keypair.
    pub fn new(keypair: &Keypair) -> Self {
        Self {
            signing_key: SigningKey::<Sha384>::new(keypair.private_key().clone()),
        }
    }

    /// Sign a digest string, returning the raw signature.
    ///
    /// PKCS#1 v1.5 is deterministic: the same digest and key always yield the
    /// same signature.
    pub fn sign_raw(&self, digest: &str) -> RecordSignature {
        let signature = self.signing_key.sign(digest.as_bytes());
        RecordSignature(signature.to_vec())
    }

    /// Sign a digest string, returning base64.
    pub fn sign(&self, digest: &str) -> String {
        self.sign_raw(digest).to_base64()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signer(rsa-{}-sha384)", RSA_KEY_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_email;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::signature::Signer as _;

    fn make_signer() -> Signer {
        let keypair = Keypair::generate_with(&mut StdRng::seed_from_u64(11)).unwrap();
        Signer::new(&keypair)
    }

    #[test]
    fn test_signature_length_matches_modulus() {
        let signer = make_signer();
        let sig = signer.sign_raw(&hash_email("a@x.com"));
        assert_eq!(sig.as_bytes().len(), RSA_KEY_BITS / 8);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = make_signer();
        let digest = hash_email("a@x.com");
        assert_eq!(signer.sign(&digest), signer.sign(&digest));
    }

    #[test]
    fn test_different_digests_different_signatures() {
        let signer = make_signer();
        assert_ne!(
            signer.sign(&hash_email("a@x.com")),
            signer.sign(&hash_email("b@x.com"))
        );
    }

    #[test]
    fn test_signs_hex_text_not_raw_digest() {
        let signer = make_signer();
        let digest = hash_email("a@x.com");
        let raw = hex::decode(&digest).unwrap();

        // Signing the decoded bytes would be a different message.
        let over_text = signer.signing_key.sign(digest.as_bytes()).to_vec();
        let over_raw = signer.signing_key.sign(&raw).to_vec();
        assert_eq!(signer.sign_raw(&digest).0, over_text);
        assert_ne!(over_text, over_raw);
    }
}
