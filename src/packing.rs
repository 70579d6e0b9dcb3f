//! Bit-width-exact packing of typed instruction fields into big integers,
//! and the instruction-type tag each packed word embeds.

use num_bigint::BigUint;
use num_traits::Zero;

/// The seven message shapes this core hashes, tagged by the small integer
/// the packed word embeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionType {
    LimitOrder = 0,
    Transfer = 1,
    TransferWithCondition = 2,
    LimitOrderWithFee = 3,
    TransferWithFee = 4,
    TransferWithConditionWithFee = 5,
}

impl InstructionType {
    pub fn tag(self) -> BigUint {
        BigUint::from(self as u64)
    }
}

/// Packs `(value, bit_width)` pairs, most significant field first, by
/// repeated shift-and-add: `acc = (acc << width) + value`. This is the same
/// shape as the reference SDK's field-by-field packing (see the `shift_add`
/// pattern other StarkEx signing code uses).
///
/// Callers are responsible for range-checking each value against its width
/// beforehand — this function does not re-validate widths.
pub fn pack_fields(fields: &[(BigUint, u32)]) -> BigUint {
    fields
        .iter()
        .fold(BigUint::zero(), |acc, (value, width)| (acc << *width) + value)
}

/// Order/Transfer base word: 251-bit budget holding
/// `instructionType · vault0 · vault1 · amount0 · amount1 · nonce · expiration`.
#[allow(clippy::too_many_arguments)]
pub fn pack_order_or_transfer_base(
    instruction_type: InstructionType,
    vault0: &BigUint,
    vault1: &BigUint,
    amount0: &BigUint,
    amount1: &BigUint,
    nonce: &BigUint,
    expiration: &BigUint,
) -> BigUint {
    pack_fields(&[
        (instruction_type.tag(), 4),
        (vault0.clone(), 31),
        (vault1.clone(), 31),
        (amount0.clone(), 63),
        (amount1.clone(), 63),
        (nonce.clone(), 31),
        (expiration.clone(), 22),
    ])
}

/// Transfer-with-fee word 1: `senderVaultId · receiverVaultId · feeVaultId · nonce`,
/// widths padded to 64/64/64/32.
pub fn pack_transfer_with_fee_word1(
    sender_vault_id: &BigUint,
    receiver_vault_id: &BigUint,
    fee_vault_id: &BigUint,
    nonce: &BigUint,
) -> BigUint {
    pack_fields(&[
        (sender_vault_id.clone(), 64),
        (receiver_vault_id.clone(), 64),
        (fee_vault_id.clone(), 64),
        (nonce.clone(), 32),
    ])
}

/// Transfer-with-fee word 2: `instructionType · amount · feeLimit · expiration · padding(81)`.
pub fn pack_transfer_with_fee_word2(
    instruction_type: InstructionType,
    amount: &BigUint,
    fee_limit: &BigUint,
    expiration: &BigUint,
) -> BigUint {
    pack_fields(&[
        (instruction_type.tag(), 4),
        (amount.clone(), 64),
        (fee_limit.clone(), 64),
        (expiration.clone(), 32),
        (BigUint::zero(), 81),
    ])
}

/// LimitOrder-with-fee word 1: `amountSell · amountBuy · feeLimit · nonce`.
pub fn pack_limit_order_with_fee_word1(
    amount_sell: &BigUint,
    amount_buy: &BigUint,
    fee_limit: &BigUint,
    nonce: &BigUint,
) -> BigUint {
    pack_fields(&[
        (amount_sell.clone(), 64),
        (amount_buy.clone(), 64),
        (fee_limit.clone(), 64),
        (nonce.clone(), 32),
    ])
}

/// LimitOrder-with-fee word 2: `instructionType · feeVaultId · vaultSell · vaultBuy · expiration · padding(17)`.
pub fn pack_limit_order_with_fee_word2(
    instruction_type: InstructionType,
    fee_vault_id: &BigUint,
    vault_sell: &BigUint,
    vault_buy: &BigUint,
    expiration: &BigUint,
) -> BigUint {
    pack_fields(&[
        (instruction_type.tag(), 4),
        (fee_vault_id.clone(), 64),
        (vault_sell.clone(), 64),
        (vault_buy.clone(), 64),
        (expiration.clone(), 32),
        (BigUint::zero(), 17),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_fields_matches_shift_and_add_by_hand() {
        let packed = pack_fields(&[(BigUint::from(0b101u32), 3), (BigUint::from(0b11u32), 2)]);
        // 0b101 << 2 | 0b11 = 0b10111
        assert_eq!(packed, BigUint::from(0b10111u32));
    }

    #[test]
    fn padding_field_only_shifts() {
        let with_pad = pack_fields(&[(BigUint::from(1u32), 1), (BigUint::zero(), 3)]);
        assert_eq!(with_pad, BigUint::from(0b1000u32));
    }

    #[test]
    fn limit_order_with_fee_word2_ends_in_17_bit_pad() {
        let packed = pack_limit_order_with_fee_word2(
            InstructionType::LimitOrderWithFee,
            &BigUint::from(1u32),
            &BigUint::from(1u32),
            &BigUint::from(1u32),
            &BigUint::from(1u32),
        );
        assert!(packed.bit(0) == false && packed.bit(16) == false);
    }
}
