use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use stark_crypto_core::curve::{CurveOps, CurveParameters, CurvePoint};
use stark_crypto_core::ecdsa::Signer;
use stark_crypto_core::{CryptoError, StarkCryptoCore};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_core() -> StarkCryptoCore {
    StarkCryptoCore::new()
}

/// Deterministic test-only signer: derives its per-signature nonce from a
/// SHA-256 digest of the message hash instead of a secure RNG, which is
/// fine for exercising sign/verify here but unsuitable for real signing.
struct DeterministicTestSigner {
    private_key: BigUint,
    params: CurveParameters,
    generator: CurvePoint,
}

impl DeterministicTestSigner {
    fn new(private_key: BigUint, params: CurveParameters, generator: CurvePoint) -> Self {
        DeterministicTestSigner {
            private_key,
            params,
            generator,
        }
    }

    fn public_point(&self) -> CurvePoint {
        let ops = CurveOps::new(&self.params);
        ops.scalar_mul(&self.private_key, &self.generator).unwrap()
    }

    fn nonce_for(&self, digest_hex: &str) -> BigUint {
        let mut hasher = Sha256::new();
        hasher.update(digest_hex.as_bytes());
        hasher.update(self.private_key.to_bytes_be());
        let digest = hasher.finalize();
        let mut k = BigUint::from_bytes_be(&digest) % &self.params.n;
        if k.is_zero() {
            k = BigUint::one();
        }
        k
    }
}

impl Signer for DeterministicTestSigner {
    fn sign(&self, length_adjusted_digest_hex: &str) -> stark_crypto_core::Result<(BigUint, BigUint)> {
        let ops = CurveOps::new(&self.params);
        let n = &self.params.n;
        let h = BigUint::parse_bytes(length_adjusted_digest_hex.as_bytes(), 16)
            .ok_or_else(|| CryptoError::InvalidInput("bad test digest".to_string()))?;

        loop {
            let k = self.nonce_for(length_adjusted_digest_hex);
            let r_point = ops.scalar_mul(&k, &self.generator)?;
            let r = match r_point.x() {
                Some(x) => x % n,
                None => continue,
            };
            if r.is_zero() {
                continue;
            }
            let k_inv = stark_crypto_core::bigint::FieldBigInt::from_biguint(k.clone())
                .mod_inverse(n)?
                .into_biguint();
            let s = (&k_inv * (&h + &r * &self.private_key)) % n;
            if s.is_zero() {
                continue;
            }
            return Ok((r, s));
        }
    }
}

#[test]
fn sign_then_verify_round_trips() {
    init_logging();
    let core = test_core();
    let private_key = BigUint::from(424242u64);
    let signer = DeterministicTestSigner::new(
        private_key.clone(),
        core.params().clone(),
        core.table().generator().clone(),
    );
    let public_key = core.public_key_from_point(signer.public_point());

    let msg_hash = core
        .get_transfer_msg_hash(
            "1000",
            1,
            10,
            "0x1",
            20,
            "0x2",
            100,
            None,
        )
        .unwrap();
    let msg_hash_hex = format!("0x{msg_hash}");

    let sig = core.sign(&signer, &msg_hash_hex).unwrap();
    assert!(core.verify(&public_key, &msg_hash_hex, &sig).unwrap());
}

#[test]
fn verify_rejects_wrong_digest() {
    let core = test_core();
    let private_key = BigUint::from(13u64);
    let signer = DeterministicTestSigner::new(
        private_key,
        core.params().clone(),
        core.table().generator().clone(),
    );
    let public_key = core.public_key_from_point(signer.public_point());

    let msg_hash = core
        .get_transfer_msg_hash("1000", 1, 10, "0x1", 20, "0x2", 100, None)
        .unwrap();
    let other_hash = core
        .get_transfer_msg_hash("2000", 1, 10, "0x1", 20, "0x2", 100, None)
        .unwrap();

    let sig = core.sign(&signer, &format!("0x{msg_hash}")).unwrap();
    assert!(!core
        .verify(&public_key, &format!("0x{other_hash}"), &sig)
        .unwrap());
}

#[test]
fn condition_toggles_instruction_type_and_digest() {
    let core = test_core();
    let without_condition = core
        .get_transfer_msg_hash("1000", 1, 10, "0x1", 20, "0x2", 100, None)
        .unwrap();
    let with_condition = core
        .get_transfer_msg_hash("1000", 1, 10, "0x1", 20, "0x2", 100, Some("0x7"))
        .unwrap();
    assert_ne!(without_condition, with_condition);
}

#[test]
fn vault_id_at_upper_bound_is_rejected() {
    let core = test_core();
    let too_big_vault = 1u64 << 31;
    let err = core
        .get_limit_order_msg_hash(
            too_big_vault,
            0,
            "1",
            "1",
            "0x1",
            "0x2",
            0,
            0,
        )
        .unwrap_err();
    assert!(matches!(err, CryptoError::InvalidRange("vaultSell")));
}

#[test]
fn vault_id_one_below_upper_bound_is_accepted() {
    let core = test_core();
    let max_valid_vault = (1u64 << 31) - 1;
    assert!(core
        .get_limit_order_msg_hash(max_valid_vault, 0, "1", "1", "0x1", "0x2", 0, 0)
        .is_ok());
}

#[test]
fn pedersen_requires_0x_prefixed_inputs() {
    let core = test_core();
    assert!(matches!(
        core.pedersen(&["deadbeef"]).unwrap_err(),
        CryptoError::MissingHexPrefix(_)
    ));
}

#[test]
fn limit_order_with_fee_digest_is_below_ecdsa_bound() {
    let core = test_core();
    let hash_hex = core
        .get_limit_order_msg_hash_with_fee(
            1, 2, "100", "200", "0x1", "0x2", 5, 999, "0x3", 9, "50",
        )
        .unwrap();
    let digest = BigUint::parse_bytes(hash_hex.as_bytes(), 16).unwrap();
    assert!(digest < (BigUint::one() << 251u32));
}

#[test]
fn limit_order_digest_is_below_ecdsa_bound() {
    let core = test_core();
    let hash_hex = core
        .get_limit_order_msg_hash(5, 6, "100", "200", "0x1", "0x2", 9, 0)
        .unwrap();
    let digest = BigUint::parse_bytes(hash_hex.as_bytes(), 16).unwrap();
    assert!(digest < (BigUint::one() << 251u32));
}

#[test]
fn transfer_digest_is_below_ecdsa_bound() {
    let core = test_core();
    let hash_hex = core
        .get_transfer_msg_hash("1000", 1, 10, "0x1", 20, "0x2", 100, None)
        .unwrap();
    let digest = BigUint::parse_bytes(hash_hex.as_bytes(), 16).unwrap();
    assert!(digest < (BigUint::one() << 251u32));
}

#[test]
fn transfer_with_fee_digest_is_below_ecdsa_bound() {
    let core = test_core();
    let hash_hex = core
        .get_transfer_msg_hash_with_fee(
            "1000", 1, 10, "0x1", 20, "0x2", 100, None, "0x3", 5, "50",
        )
        .unwrap();
    let digest = BigUint::parse_bytes(hash_hex.as_bytes(), 16).unwrap();
    assert!(digest < (BigUint::one() << 251u32));
}

#[test]
fn same_inputs_produce_same_transfer_hash() {
    let core = test_core();
    let first = core
        .get_transfer_msg_hash_with_fee(
            "1000", 1, 10, "0x1", 20, "0x2", 100, None, "0x3", 5, "50",
        )
        .unwrap();
    let second = core
        .get_transfer_msg_hash_with_fee(
            "1000", 1, 10, "0x1", 20, "0x2", 100, None, "0x3", 5, "50",
        )
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn sign_then_verify_round_trips_over_random_keys() {
    let core = test_core();
    let mut rng = StdRng::seed_from_u64(0xc0ffee);

    for _ in 0..5 {
        let mut key_bytes = [0u8; 32];
        rng.fill_bytes(&mut key_bytes);
        let private_key = BigUint::from_bytes_be(&key_bytes) % &core.params().n;
        if private_key.is_zero() {
            continue;
        }

        let signer = DeterministicTestSigner::new(
            private_key,
            core.params().clone(),
            core.table().generator().clone(),
        );
        let public_key = core.public_key_from_point(signer.public_point());

        let nonce = (rng.next_u32() as u64) & ((1u64 << 31) - 1);
        let msg_hash = core
            .get_transfer_msg_hash("500", nonce, 1, "0x1", 2, "0x2", 10, None)
            .unwrap();
        let msg_hash_hex = format!("0x{msg_hash}");

        let sig = core.sign(&signer, &msg_hash_hex).unwrap();
        assert!(core.verify(&public_key, &msg_hash_hex, &sig).unwrap());
    }
}
