//! Hash addresses (ADRS)
//!
//! Every tweakable-hash call is tagged with a 32-byte address naming its role:
//!
//! ```text
//! [0..4]   layer address
//! [4..16]  tree address (64-bit value in bytes 8..16)
//! [16..20] type
//! [20..24] key pair address
//! [24..28] chain address  | tree height
//! [28..32] hash address   | tree index
//! ```
//!
//! All fields are big-endian. The SHA-2 family hashes the 22-byte compressed
//! form instead (see [`Address::compressed`]).

/// Size of an uncompressed address in bytes.
pub const ADDRESS_SIZE: usize = 32;

/// Size of a compressed (SHA-2) address in bytes.
pub const COMPRESSED_ADDRESS_SIZE: usize = 22;

const LAYER: usize = 0;
const TREE: usize = 8;
const TYPE: usize = 16;
const KEY_PAIR: usize = 20;
const CHAIN: usize = 24;
const HASH: usize = 28;

/// Role of a hash call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AddressType {
    /// Step of a WOTS+ chain
    WotsHash = 0,
    /// Compression of WOTS+ chain tops into a one-time public key
    WotsPk = 1,
    /// Internal node of a hypertree layer
    Tree = 2,
    /// Leaf or internal node of a FORS tree
    ForsTree = 3,
    /// Compression of the FORS roots
    ForsRoots = 4,
    /// Derivation of a WOTS+ chain start value
    WotsPrf = 5,
    /// Derivation of a FORS secret leaf
    ForsPrf = 6,
}

impl AddressType {
    fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::WotsHash,
            1 => Self::WotsPk,
            2 => Self::Tree,
            3 => Self::ForsTree,
            4 => Self::ForsRoots,
            5 => Self::WotsPrf,
            6 => Self::ForsPrf,
            _ => return None,
        })
    }
}

/// Structured domain-separation tag for one hash call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// All-zero address (layer 0, tree 0, type `WotsHash`)
    #[must_use]
    pub const fn new() -> Self {
        Self([0u8; ADDRESS_SIZE])
    }

    fn put(&mut self, offset: usize, value: u32) {
        self.0[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    fn word(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.0[offset..offset + 4]);
        u32::from_be_bytes(word)
    }

    /// Set the hypertree layer
    pub fn set_layer(&mut self, layer: u32) {
        self.put(LAYER, layer);
    }

    /// Hypertree layer
    #[must_use]
    pub fn layer(&self) -> u32 {
        self.word(LAYER)
    }

    /// Set the tree address; the upper 4 bytes of the 12-byte field stay zero
    pub fn set_tree(&mut self, tree: u64) {
        self.0[4..TREE].fill(0);
        self.0[TREE..TYPE].copy_from_slice(&tree.to_be_bytes());
    }

    /// Tree address
    #[must_use]
    pub fn tree(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[TREE..TYPE]);
        u64::from_be_bytes(word)
    }

    /// Change the role and zero the key pair, chain/height and hash/index
    /// fields so nothing from the previous role leaks into the new one.
    pub fn set_type_and_clear(&mut self, kind: AddressType) {
        self.put(TYPE, kind as u32);
        self.0[KEY_PAIR..].fill(0);
    }

    /// Role of this address, `None` if the type word is not a known role
    #[must_use]
    pub fn address_type(&self) -> Option<AddressType> {
        AddressType::from_u32(self.word(TYPE))
    }

    /// Set the key pair (WOTS+ leaf or FORS instance) index
    pub fn set_key_pair(&mut self, key_pair: u32) {
        self.put(KEY_PAIR, key_pair);
    }

    /// Key pair index
    #[must_use]
    pub fn key_pair(&self) -> u32 {
        self.word(KEY_PAIR)
    }

    /// Set the WOTS+ chain index
    pub fn set_chain(&mut self, chain: u32) {
        self.put(CHAIN, chain);
    }

    /// WOTS+ chain index
    #[must_use]
    pub fn chain(&self) -> u32 {
        self.word(CHAIN)
    }

    /// Set the position within a WOTS+ chain
    pub fn set_hash(&mut self, hash: u32) {
        self.put(HASH, hash);
    }

    /// Position within a WOTS+ chain
    #[must_use]
    pub fn hash(&self) -> u32 {
        self.word(HASH)
    }

    /// Set the node height (shares the chain field)
    pub fn set_tree_height(&mut self, height: u32) {
        self.put(CHAIN, height);
    }

    /// Node height
    #[must_use]
    pub fn tree_height(&self) -> u32 {
        self.word(CHAIN)
    }

    /// Set the node index (shares the hash field)
    pub fn set_tree_index(&mut self, index: u32) {
        self.put(HASH, index);
    }

    /// Node index
    #[must_use]
    pub fn tree_index(&self) -> u32 {
        self.word(HASH)
    }

    /// Full 32-byte encoding
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// 22-byte encoding hashed by the SHA-2 family:
    /// `layer[3] ‖ tree[8..16] ‖ type[19] ‖ [20..32]`
    #[must_use]
    pub fn compressed(&self) -> [u8; COMPRESSED_ADDRESS_SIZE] {
        let mut out = [0u8; COMPRESSED_ADDRESS_SIZE];
        out[0] = self.0[3];
        out[1..9].copy_from_slice(&self.0[TREE..TYPE]);
        out[9] = self.0[19];
        out[10..].copy_from_slice(&self.0[KEY_PAIR..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_round_trip() {
        let mut adrs = Address::new();
        adrs.set_layer(3);
        adrs.set_tree(0x0102_0304_0506_0708);
        adrs.set_type_and_clear(AddressType::ForsTree);
        adrs.set_key_pair(9);
        adrs.set_tree_height(4);
        adrs.set_tree_index(77);

        assert_eq!(adrs.layer(), 3);
        assert_eq!(adrs.tree(), 0x0102_0304_0506_0708);
        assert_eq!(adrs.address_type(), Some(AddressType::ForsTree));
        assert_eq!(adrs.key_pair(), 9);
        assert_eq!(adrs.tree_height(), 4);
        assert_eq!(adrs.tree_index(), 77);
        assert_eq!(adrs.chain(), 4);
        assert_eq!(adrs.hash(), 77);
    }

    #[test]
    fn test_type_change_clears_lower_fields() {
        let mut adrs = Address::new();
        adrs.set_layer(1);
        adrs.set_tree(5);
        adrs.set_key_pair(2);
        adrs.set_chain(7);
        adrs.set_hash(11);

        adrs.set_type_and_clear(AddressType::Tree);
        assert_eq!(adrs.layer(), 1);
        assert_eq!(adrs.tree(), 5);
        assert_eq!(adrs.key_pair(), 0);
        assert_eq!(adrs.chain(), 0);
        assert_eq!(adrs.hash(), 0);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut adrs = Address::new();
        adrs.set_layer(0x0a);
        adrs.set_tree(0x0b0c);
        adrs.set_type_and_clear(AddressType::WotsPk);
        adrs.set_key_pair(0x0d);

        let bytes = adrs.as_bytes();
        assert_eq!(bytes[3], 0x0a);
        assert_eq!(&bytes[14..16], &[0x0b, 0x0c]);
        assert_eq!(bytes[19], 1);
        assert_eq!(bytes[23], 0x0d);
    }

    #[test]
    fn test_compressed_layout() {
        let mut adrs = Address::new();
        adrs.set_layer(2);
        adrs.set_tree(0x1122_3344_5566_7788);
        adrs.set_type_and_clear(AddressType::WotsPrf);
        adrs.set_key_pair(0xaabb_ccdd);
        adrs.set_chain(1);
        adrs.set_hash(2);

        let c = adrs.compressed();
        assert_eq!(c[0], 2);
        assert_eq!(&c[1..9], &0x1122_3344_5566_7788u64.to_be_bytes());
        assert_eq!(c[9], 5);
        assert_eq!(&c[10..14], &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(&c[14..18], &1u32.to_be_bytes());
        assert_eq!(&c[18..22], &2u32.to_be_bytes());
    }

    #[test]
    fn test_distinct_roles_never_collide() {
        let mut chain_step = Address::new();
        chain_step.set_type_and_clear(AddressType::WotsHash);
        chain_step.set_chain(1);

        let mut node = Address::new();
        node.set_type_and_clear(AddressType::Tree);
        node.set_tree_height(1);

        assert_ne!(chain_step, node);
        assert_ne!(chain_step.as_bytes(), node.as_bytes());
    }
}
