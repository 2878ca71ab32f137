/// Hash a file name the way MPFS2 loaders expect
///
/// Sums the Unicode scalar value of every character, wrapping at 16 bits.
/// This is a consistency check stored in each FAT entry, not a lookup key,
/// and must stay bit-for-bit compatible with existing loaders.
pub fn name_hash(name: &str) -> u16 {
    name.chars()
        .fold(0u16, |hash, c| hash.wrapping_add(c as u32 as u16))
}
