//! Closed identifier vocabulary for statistic requirements
//!
//! Block-keyed statistics (block-break, block-place) accept only names from
//! the block table; item-keyed statistics (item-use, item-craft) only names
//! from the item table. Matching is case-insensitive; identifiers are
//! canonicalized to uppercase.

/// Which statistic family an identifier may qualify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Block,
    Item,
}

const BLOCKS: &[&str] = &[
    "STONE",
    "COBBLESTONE",
    "DIRT",
    "GRASS_BLOCK",
    "SAND",
    "GRAVEL",
    "OAK_LOG",
    "BIRCH_LOG",
    "SPRUCE_LOG",
    "COAL_ORE",
    "IRON_ORE",
    "GOLD_ORE",
    "DIAMOND_ORE",
    "EMERALD_ORE",
    "LAPIS_ORE",
    "REDSTONE_ORE",
    "NETHERRACK",
    "QUARTZ_ORE",
    "OBSIDIAN",
    "SANDSTONE",
    "CLAY",
    "SNOW_BLOCK",
    "ICE",
    "GLOWSTONE",
    "END_STONE",
];

const ITEMS: &[&str] = &[
    "BREAD",
    "COOKED_BEEF",
    "COOKED_PORKCHOP",
    "GOLDEN_APPLE",
    "ENDER_PEARL",
    "WOODEN_PICKAXE",
    "STONE_PICKAXE",
    "IRON_PICKAXE",
    "DIAMOND_PICKAXE",
    "IRON_SWORD",
    "DIAMOND_SWORD",
    "BOW",
    "ARROW",
    "FISHING_ROD",
    "FLINT_AND_STEEL",
    "BUCKET",
    "TORCH",
    "LADDER",
    "BOAT",
    "MINECART",
];

/// Canonical form used for lookups and backend qualifiers
pub fn canonical(name: &str) -> String {
    name.to_ascii_uppercase()
}

pub fn is_valid(name: &str, kind: MaterialKind) -> bool {
    let canon = canonical(name);
    let table = match kind {
        MaterialKind::Block => BLOCKS,
        MaterialKind::Item => ITEMS,
    };
    table.contains(&canon.as_str())
}
