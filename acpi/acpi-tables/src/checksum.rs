//! # ACPI Checksum Arithmetic
//!
//! Every ACPI structure guards itself with the same invariant: the unsigned
//! byte sum over its declared length is zero modulo 256. Verification sums a
//! range; repair picks the one checksum byte value that restores the
//! invariant. All arithmetic wraps; the repair relies on `wrapping_sub`
//! rather than on any platform overflow behavior.

/// Sum of all bytes, truncated to 8 bits.
#[must_use]
pub fn sum_bytes(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Whether the byte sum over `bytes` is zero modulo 256.
///
/// `bytes` must cover exactly the structure's declared length.
#[must_use]
pub fn verify(bytes: &[u8]) -> bool {
    sum_bytes(bytes) == 0
}

/// Rewrite the checksum byte at `checksum_offset` so that [`verify`] holds
/// over the whole of `table`.
///
/// `table` must cover exactly the structure's **declared** length. Fixed
/// compile-time sizes are wrong here: headers routinely carry
/// vendor-specific trailing fields beyond the minimum layout, and those
/// bytes participate in the sum.
///
/// # Panics
/// Panics if `checksum_offset` is out of bounds. Callers obtain the offset
/// from a validated table view, which cannot be shorter than its header.
pub fn recompute(table: &mut [u8], checksum_offset: usize) {
    table[checksum_offset] = 0;
    table[checksum_offset] = 0u8.wrapping_sub(sum_bytes(table));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_wraps_instead_of_saturating() {
        assert_eq!(sum_bytes(&[0xFF, 0x02]), 0x01);
        assert_eq!(sum_bytes(&[0x80, 0x80]), 0x00);
        assert_eq!(sum_bytes(&[0xFF; 256]), 0x00);
    }

    #[test]
    fn sum_is_additive_over_concatenation() {
        let cases: &[(&[u8], &[u8])] = &[
            (&[], &[]),
            (&[1, 2, 3], &[]),
            (&[0xFF, 0xFE], &[0x03, 0x10]),
            (&[0x55; 31], &[0xAA; 17]),
        ];
        for (a, b) in cases {
            let mut joined = Vec::from(*a);
            joined.extend_from_slice(b);
            assert_eq!(
                sum_bytes(&joined),
                sum_bytes(a).wrapping_add(sum_bytes(b)),
                "sum must distribute over concatenation"
            );
        }
    }

    #[test]
    fn recompute_restores_the_invariant() {
        // A spread of lengths and in-bounds checksum offsets, with payloads
        // chosen so the pre-repair sum is non-trivial.
        let cases: [(usize, usize); 5] = [(10, 0), (10, 9), (36, 9), (64, 32), (244, 9)];
        for (len, offset) in cases {
            let mut table: Vec<u8> = (0..=u8::MAX)
                .cycle()
                .map(|b| b.wrapping_mul(37))
                .take(len)
                .collect();

            recompute(&mut table, offset);
            assert!(verify(&table), "len={len} offset={offset}");
        }
    }

    #[test]
    fn recompute_only_touches_the_checksum_byte() {
        let mut table = vec![0x11u8; 20];
        let before = table.clone();
        recompute(&mut table, 9);

        for (i, (a, b)) in before.iter().zip(&table).enumerate() {
            if i != 9 {
                assert_eq!(a, b, "byte {i} changed");
            }
        }
    }

    #[test]
    fn recompute_is_stable_on_an_already_valid_table() {
        let mut table = vec![0x20u8; 16];
        recompute(&mut table, 3);
        let first = table.clone();
        recompute(&mut table, 3);
        assert_eq!(first, table);
    }
}
