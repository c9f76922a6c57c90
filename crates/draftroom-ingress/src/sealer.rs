//! Bid sealer — encrypts bid payloads into opaque tokens.
//!
//! A sealed token is `hex(nonce):hex(tag):hex(ciphertext)` over the JSON
//! payload `{player_id, amount}`, encrypted with AES-256-GCM under a
//! per-deployment key. Tokens are stored as-is in the bid ledger and only
//! opened by the finalizer, so no reader of the ledger learns a bid's
//! player or amount before the round closes.

use aes_gcm::AesGcm;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use draftroom_types::{DraftroomError, PlayerId, Result, constants};
use rand::RngCore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// AES-256-GCM with the 16-byte nonce the token format carries.
type SealCipher = AesGcm<Aes256, U16>;

/// The encrypted JSON payload inside every token.
#[derive(Debug, Serialize, Deserialize)]
struct BidPayload {
    player_id: PlayerId,
    amount: Decimal,
}

/// Seals and unseals bid tokens with a fixed AES-256 key.
pub struct BidSealer {
    cipher: SealCipher,
}

// The cipher holds key material; Debug must not render it.
impl std::fmt::Debug for BidSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidSealer").finish_non_exhaustive()
    }
}

impl BidSealer {
    /// Create a sealer from a 64-character hex key.
    ///
    /// A key of the wrong length or with non-hex characters is a
    /// deployment mistake, surfaced at construction rather than on the
    /// first seal call.
    pub fn from_hex_key(hex_key: &str) -> Result<Self> {
        let key = hex::decode(hex_key)
            .map_err(|err| DraftroomError::Configuration(format!("sealing key is not hex: {err}")))?;
        Self::from_key_bytes(&key)
    }

    /// Create a sealer from raw key bytes.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self> {
        if key.len() != constants::SEAL_KEY_LEN {
            return Err(DraftroomError::Configuration(format!(
                "sealing key must be {} bytes, got {}",
                constants::SEAL_KEY_LEN,
                key.len(),
            )));
        }
        let cipher = SealCipher::new_from_slice(key)
            .map_err(|err| DraftroomError::Configuration(format!("sealing key rejected: {err}")))?;
        Ok(Self { cipher })
    }

    /// Seal a `(player, amount)` pair into a token.
    ///
    /// Every call draws a fresh random nonce, so sealing the same payload
    /// twice yields different tokens.
    pub fn seal(&self, player_id: PlayerId, amount: Decimal) -> Result<String> {
        let payload = serde_json::to_vec(&BidPayload { player_id, amount })?;

        let mut nonce = [0u8; constants::SEAL_NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        // aead output is ciphertext || tag; the token carries them split.
        let sealed = self
            .cipher
            .encrypt(aes_gcm::Nonce::from_slice(&nonce), payload.as_slice())
            .map_err(|_| DraftroomError::Sealing {
                reason: "encryption failed".to_string(),
            })?;
        let split_at = sealed.len() - constants::SEAL_TAG_LEN;
        let (ciphertext, tag) = sealed.split_at(split_at);

        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(ciphertext),
        ))
    }

    /// Open a sealed token back into its `(player, amount)` pair.
    ///
    /// Any malformed token, wrong key, or tampered component fails with
    /// a `Decryption` error naming the component.
    pub fn unseal(&self, token: &str) -> Result<(PlayerId, Decimal)> {
        let parts: Vec<&str> = token.split(':').collect();
        let [nonce_hex, tag_hex, ciphertext_hex] = parts.as_slice() else {
            return Err(DraftroomError::Decryption {
                reason: format!("token has {} parts, expected 3", parts.len()),
            });
        };

        let nonce = decode_part(nonce_hex, "nonce")?;
        let tag = decode_part(tag_hex, "tag")?;
        let ciphertext = decode_part(ciphertext_hex, "ciphertext")?;

        if nonce.len() != constants::SEAL_NONCE_LEN {
            return Err(DraftroomError::Decryption {
                reason: format!("nonce is {} bytes, expected {}", nonce.len(), constants::SEAL_NONCE_LEN),
            });
        }
        if tag.len() != constants::SEAL_TAG_LEN {
            return Err(DraftroomError::Decryption {
                reason: format!("tag is {} bytes, expected {}", tag.len(), constants::SEAL_TAG_LEN),
            });
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let payload = self
            .cipher
            .decrypt(aes_gcm::Nonce::from_slice(&nonce), sealed.as_slice())
            .map_err(|_| DraftroomError::Decryption {
                reason: "authentication failed".to_string(),
            })?;

        let payload: BidPayload =
            serde_json::from_slice(&payload).map_err(|err| DraftroomError::Decryption {
                reason: format!("payload is not valid JSON: {err}"),
            })?;
        Ok((payload.player_id, payload.amount))
    }
}

fn decode_part(part: &str, name: &str) -> Result<Vec<u8>> {
    hex::decode(part).map_err(|err| DraftroomError::Decryption {
        reason: format!("{name} is not hex: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn make_sealer() -> BidSealer {
        BidSealer::from_hex_key(KEY_HEX).unwrap()
    }

    #[test]
    fn seal_unseal_roundtrip() {
        let sealer = make_sealer();
        let player = PlayerId::new();
        let amount = Decimal::new(55, 0);

        let token = sealer.seal(player, amount).unwrap();
        let (got_player, got_amount) = sealer.unseal(&token).unwrap();

        assert_eq!(got_player, player);
        assert_eq!(got_amount, amount);
    }

    #[test]
    fn token_has_three_hex_parts() {
        let sealer = make_sealer();
        let token = sealer.seal(PlayerId::new(), Decimal::new(30, 0)).unwrap();
        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), constants::SEAL_NONCE_LEN * 2);
        assert_eq!(parts[1].len(), constants::SEAL_TAG_LEN * 2);
        assert!(parts.iter().all(|p| hex::decode(p).is_ok()));
    }

    #[test]
    fn same_payload_seals_to_different_tokens() {
        let sealer = make_sealer();
        let player = PlayerId::new();
        let t1 = sealer.seal(player, Decimal::new(40, 0)).unwrap();
        let t2 = sealer.seal(player, Decimal::new(40, 0)).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let sealer = make_sealer();
        let token = sealer.seal(PlayerId::new(), Decimal::new(25, 0)).unwrap();

        let mut parts: Vec<String> = token.split(':').map(String::from).collect();
        let mut ct = hex::decode(&parts[2]).unwrap();
        ct[0] ^= 0xFF;
        parts[2] = hex::encode(ct);

        let err = sealer.unseal(&parts.join(":")).unwrap_err();
        assert!(matches!(err, DraftroomError::Decryption { .. }));
    }

    #[test]
    fn tampered_tag_rejected() {
        let sealer = make_sealer();
        let token = sealer.seal(PlayerId::new(), Decimal::new(25, 0)).unwrap();

        let mut parts: Vec<String> = token.split(':').map(String::from).collect();
        let mut tag = hex::decode(&parts[1]).unwrap();
        tag[0] ^= 0xFF;
        parts[1] = hex::encode(tag);

        assert!(sealer.unseal(&parts.join(":")).is_err());
    }

    #[test]
    fn wrong_key_rejected() {
        let sealer = make_sealer();
        let other = BidSealer::from_hex_key(
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .unwrap();

        let token = sealer.seal(PlayerId::new(), Decimal::new(60, 0)).unwrap();
        assert!(other.unseal(&token).is_err());
    }

    #[test]
    fn malformed_token_rejected() {
        let sealer = make_sealer();
        for bad in ["", "abc", "aa:bb", "zz:zz:zz", "aa:bb:cc:dd"] {
            let err = sealer.unseal(bad).unwrap_err();
            assert!(matches!(err, DraftroomError::Decryption { .. }), "token {bad:?}");
        }
    }

    #[test]
    fn short_key_is_configuration_error() {
        let err = BidSealer::from_hex_key("00ff").unwrap_err();
        assert!(matches!(err, DraftroomError::Configuration(_)));
    }

    #[test]
    fn non_hex_key_is_configuration_error() {
        let err = BidSealer::from_hex_key("not-a-hex-key").unwrap_err();
        assert!(matches!(err, DraftroomError::Configuration(_)));
    }

    #[test]
    fn debug_output_omits_key_material() {
        let rendered = format!("{:?}", make_sealer());
        assert_eq!(rendered, "BidSealer { .. }");
        assert!(!rendered.contains("00"));
    }
}
