/// Render a 32-bit value as four space-separated uppercase hex pairs,
/// least-significant byte first.
pub fn little_endian32(value: u32) -> String {
    hex_pairs(&value.to_le_bytes())
}

/// Render a 16-bit value as two space-separated uppercase hex pairs,
/// least-significant byte first.
pub fn little_endian16(value: u16) -> String {
    hex_pairs(&value.to_le_bytes())
}

fn hex_pairs(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap a displacement into its unsigned representation of the given bit
/// width. Positive deltas encode directly; zero and negative deltas wrap
/// around the modulus, two's-complement style.
pub fn wrap_displacement(delta: i64, bits: u32) -> u64 {
    delta.rem_euclid(1i64 << bits) as u64
}
