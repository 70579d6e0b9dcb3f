//! Order / Transfer / OrderWithFee / TransferWithFee hashers.
//!
//! Each hasher packs its typed fields into one or two field elements and
//! combines them with [`pedersen_hash`] in a tree whose shape depends on
//! whether a fee and/or a condition are present.

use num_bigint::BigUint;

use crate::bigint::FieldBigInt;
use crate::error::{CryptoError, Result};
use crate::packing::{
    pack_limit_order_with_fee_word1, pack_limit_order_with_fee_word2, pack_order_or_transfer_base,
    pack_transfer_with_fee_word1, pack_transfer_with_fee_word2, InstructionType,
};
use crate::pedersen::{pedersen_hash, to_output_hex};
use crate::range::{
    assert_amount, assert_expiration, assert_fee_limit, assert_field_element, assert_nonce,
    assert_vault,
};
use crate::StarkCryptoCore;

/// Parses a `0x`-prefixed hex field element and checks it lies in `[0, p)`.
fn parse_hex_field(value: &str, name: &'static str, prime: &BigUint) -> Result<BigUint> {
    if !value.starts_with("0x") && !value.starts_with("0X") {
        return Err(CryptoError::MissingHexPrefix(value.to_string()));
    }
    let parsed = FieldBigInt::from_hex(value)?.into_biguint();
    assert_field_element(&parsed, prime, name)?;
    Ok(parsed)
}

/// Parses a base-10 amount/fee-limit string; amounts and fee limits arrive
/// this way to preserve the full 63-bit range.
fn parse_decimal(value: &str) -> Result<BigUint> {
    Ok(FieldBigInt::from_dec(value)?.into_biguint())
}

/// Final defensive check every hasher applies to its own output: the
/// Pedersen output is already `< p`, but the stricter `< 2^251` bound must
/// be rechecked.
fn assert_digest_in_range(digest: &BigUint, max_ecdsa_val: &BigUint) -> Result<()> {
    if digest < max_ecdsa_val {
        Ok(())
    } else {
        Err(CryptoError::DigestOutOfRange(to_output_hex(digest)))
    }
}

impl StarkCryptoCore {
    /// `pedersen(inputs)`: the raw public hash primitive. Each input is a
    /// `0x`-prefixed hex field element.
    pub fn pedersen(&self, inputs: &[&str]) -> Result<String> {
        let prime = &self.params.p;
        let parsed: Result<Vec<BigUint>> = inputs
            .iter()
            .map(|s| parse_hex_field(s, "pedersen input", prime))
            .collect();
        let digest = pedersen_hash(&parsed?, &self.table, &self.params)?;
        Ok(to_output_hex(&digest))
    }

    /// `getLimitOrderMsgHash` (instructionType = 0).
    #[allow(clippy::too_many_arguments)]
    pub fn get_limit_order_msg_hash(
        &self,
        vault_sell: u64,
        vault_buy: u64,
        amount_sell: &str,
        amount_buy: &str,
        token_sell: &str,
        token_buy: &str,
        nonce: u64,
        expiration_timestamp: u64,
    ) -> Result<String> {
        let prime = &self.params.p;
        let vault_sell = BigUint::from(vault_sell);
        let vault_buy = BigUint::from(vault_buy);
        let nonce = BigUint::from(nonce);
        let expiration = BigUint::from(expiration_timestamp);
        let amount_sell = parse_decimal(amount_sell)?;
        let amount_buy = parse_decimal(amount_buy)?;
        let token_sell = parse_hex_field(token_sell, "tokenSell", prime)?;
        let token_buy = parse_hex_field(token_buy, "tokenBuy", prime)?;

        assert_vault(&vault_sell, "vaultSell")?;
        assert_vault(&vault_buy, "vaultBuy")?;
        assert_amount(&amount_sell, "amountSell")?;
        assert_amount(&amount_buy, "amountBuy")?;
        assert_nonce(&nonce, "nonce")?;
        assert_expiration(&expiration, "expirationTimestamp")?;

        let tokens = pedersen_hash(&[token_sell, token_buy], &self.table, &self.params)?;
        let packed_base = pack_order_or_transfer_base(
            InstructionType::LimitOrder,
            &vault_sell,
            &vault_buy,
            &amount_sell,
            &amount_buy,
            &nonce,
            &expiration,
        );
        let digest = pedersen_hash(&[tokens, packed_base], &self.table, &self.params)?;
        assert_digest_in_range(&digest, &self.max_ecdsa_val)?;
        log::trace!("limit order hash computed (no fee)");
        Ok(to_output_hex(&digest))
    }

    /// `getLimitOrderMsgHashWithFee` (instructionType = 3).
    #[allow(clippy::too_many_arguments)]
    pub fn get_limit_order_msg_hash_with_fee(
        &self,
        vault_sell: u64,
        vault_buy: u64,
        amount_sell: &str,
        amount_buy: &str,
        token_sell: &str,
        token_buy: &str,
        nonce: u64,
        expiration_timestamp: u64,
        fee_token: &str,
        fee_vault_id: u64,
        fee_limit: &str,
    ) -> Result<String> {
        let prime = &self.params.p;
        let vault_sell = BigUint::from(vault_sell);
        let vault_buy = BigUint::from(vault_buy);
        let fee_vault_id = BigUint::from(fee_vault_id);
        let nonce = BigUint::from(nonce);
        let expiration = BigUint::from(expiration_timestamp);
        let amount_sell = parse_decimal(amount_sell)?;
        let amount_buy = parse_decimal(amount_buy)?;
        let fee_limit = parse_decimal(fee_limit)?;
        let token_sell = parse_hex_field(token_sell, "tokenSell", prime)?;
        let token_buy = parse_hex_field(token_buy, "tokenBuy", prime)?;
        let fee_token = parse_hex_field(fee_token, "feeToken", prime)?;

        assert_vault(&vault_sell, "vaultSell")?;
        assert_vault(&vault_buy, "vaultBuy")?;
        assert_vault(&fee_vault_id, "feeVaultId")?;
        assert_amount(&amount_sell, "amountSell")?;
        assert_amount(&amount_buy, "amountBuy")?;
        assert_fee_limit(&fee_limit, "feeLimit")?;
        assert_nonce(&nonce, "nonce")?;
        assert_expiration(&expiration, "expirationTimestamp")?;

        let tokens = pedersen_hash(&[token_sell, token_buy], &self.table, &self.params)?;
        let tmp = pedersen_hash(&[tokens, fee_token], &self.table, &self.params)?;
        let packed1 =
            pack_limit_order_with_fee_word1(&amount_sell, &amount_buy, &fee_limit, &nonce);
        let packed2 = pack_limit_order_with_fee_word2(
            InstructionType::LimitOrderWithFee,
            &fee_vault_id,
            &vault_sell,
            &vault_buy,
            &expiration,
        );
        let mid = pedersen_hash(&[tmp, packed1], &self.table, &self.params)?;
        let digest = pedersen_hash(&[mid, packed2], &self.table, &self.params)?;
        assert_digest_in_range(&digest, &self.max_ecdsa_val)?;
        log::trace!("limit order hash computed (with fee)");
        Ok(to_output_hex(&digest))
    }

    /// `getTransferMsgHash`. `condition = None` selects instructionType 1;
    /// `Some(hex)` selects instructionType 2 — the two code paths produce
    /// distinct digests for otherwise-identical fields.
    #[allow(clippy::too_many_arguments)]
    pub fn get_transfer_msg_hash(
        &self,
        amount: &str,
        nonce: u64,
        sender_vault_id: u64,
        token: &str,
        receiver_vault_id: u64,
        receiver_public_key: &str,
        expiration_timestamp: u64,
        condition: Option<&str>,
    ) -> Result<String> {
        let prime = &self.params.p;
        let sender_vault_id = BigUint::from(sender_vault_id);
        let receiver_vault_id = BigUint::from(receiver_vault_id);
        let nonce = BigUint::from(nonce);
        let expiration = BigUint::from(expiration_timestamp);
        let amount = parse_decimal(amount)?;
        let token = parse_hex_field(token, "token", prime)?;
        let receiver_public_key = parse_hex_field(receiver_public_key, "receiverPublicKey", prime)?;

        assert_vault(&sender_vault_id, "senderVaultId")?;
        assert_vault(&receiver_vault_id, "receiverVaultId")?;
        assert_amount(&amount, "amount")?;
        assert_nonce(&nonce, "nonce")?;
        assert_expiration(&expiration, "expirationTimestamp")?;

        let token_and_receiver =
            pedersen_hash(&[token, receiver_public_key], &self.table, &self.params)?;

        let (instruction_type, inner) = match condition {
            None => (InstructionType::Transfer, token_and_receiver),
            Some(condition) => {
                // condition is parsed as hex in both the fee and no-fee
                // paths.
                let condition = parse_hex_field(condition, "condition", prime)?;
                let with_condition = pedersen_hash(
                    &[token_and_receiver, condition],
                    &self.table,
                    &self.params,
                )?;
                (InstructionType::TransferWithCondition, with_condition)
            }
        };

        let packed_base = pack_order_or_transfer_base(
            instruction_type,
            &sender_vault_id,
            &receiver_vault_id,
            &amount,
            &BigUint::from(0u32),
            &nonce,
            &expiration,
        );
        let digest = pedersen_hash(&[inner, packed_base], &self.table, &self.params)?;
        assert_digest_in_range(&digest, &self.max_ecdsa_val)?;
        log::trace!("transfer hash computed, instructionType={instruction_type:?}");
        Ok(to_output_hex(&digest))
    }

    /// `getTransferMsgHashWithFee`. `condition = None` selects
    /// instructionType 4; `Some(hex)` selects instructionType 5.
    #[allow(clippy::too_many_arguments)]
    pub fn get_transfer_msg_hash_with_fee(
        &self,
        amount: &str,
        nonce: u64,
        sender_vault_id: u64,
        token: &str,
        receiver_vault_id: u64,
        receiver_public_key: &str,
        expiration_timestamp: u64,
        condition: Option<&str>,
        fee_token: &str,
        fee_vault_id: u64,
        fee_limit: &str,
    ) -> Result<String> {
        let prime = &self.params.p;
        let sender_vault_id = BigUint::from(sender_vault_id);
        let receiver_vault_id = BigUint::from(receiver_vault_id);
        let fee_vault_id = BigUint::from(fee_vault_id);
        let nonce = BigUint::from(nonce);
        let expiration = BigUint::from(expiration_timestamp);
        let amount = parse_decimal(amount)?;
        let fee_limit = parse_decimal(fee_limit)?;
        let token = parse_hex_field(token, "token", prime)?;
        let receiver_public_key = parse_hex_field(receiver_public_key, "receiverPublicKey", prime)?;
        let fee_token = parse_hex_field(fee_token, "feeToken", prime)?;

        assert_vault(&sender_vault_id, "senderVaultId")?;
        assert_vault(&receiver_vault_id, "receiverVaultId")?;
        assert_vault(&fee_vault_id, "feeVaultId")?;
        assert_amount(&amount, "amount")?;
        assert_fee_limit(&fee_limit, "feeLimit")?;
        assert_nonce(&nonce, "nonce")?;
        assert_expiration(&expiration, "expirationTimestamp")?;

        let token_and_fee = pedersen_hash(&[token, fee_token], &self.table, &self.params)?;
        let tmp = pedersen_hash(
            &[token_and_fee, receiver_public_key],
            &self.table,
            &self.params,
        )?;

        let (instruction_type, tmp) = match condition {
            None => (InstructionType::TransferWithFee, tmp),
            Some(condition) => {
                let condition = parse_hex_field(condition, "condition", prime)?;
                let with_condition = pedersen_hash(&[tmp, condition], &self.table, &self.params)?;
                (InstructionType::TransferWithConditionWithFee, with_condition)
            }
        };

        let packed1 =
            pack_transfer_with_fee_word1(&sender_vault_id, &receiver_vault_id, &fee_vault_id, &nonce);
        let packed2 =
            pack_transfer_with_fee_word2(instruction_type, &amount, &fee_limit, &expiration);
        let mid = pedersen_hash(&[tmp, packed1], &self.table, &self.params)?;
        let digest = pedersen_hash(&[mid, packed2], &self.table, &self.params)?;
        assert_digest_in_range(&digest, &self.max_ecdsa_val)?;
        log::trace!("transfer-with-fee hash computed, instructionType={instruction_type:?}");
        Ok(to_output_hex(&digest))
    }
}
