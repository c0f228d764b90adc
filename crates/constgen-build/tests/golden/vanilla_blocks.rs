// @generated by constgen. Do not edit by hand.

//! Represents a holder of built-in blocks.
//!
//! Code autogenerated, do not edit!

pub static STONE: crate::block::VanillaBlock = crate::block::VanillaBlock::new("core", "stone");
pub static OAK_LOG: crate::block::VanillaBlock = crate::block::VanillaBlock::new("core", "oak_log");

static VALUES: [&crate::block::VanillaBlock; 2] = [
    &STONE,
    &OAK_LOG,
];

/// Gets all built-in blocks.
#[must_use]
pub fn values() -> &'static [&'static crate::block::VanillaBlock] {
    &VALUES
}
