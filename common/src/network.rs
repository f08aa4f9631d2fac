//! Network primitives: address families, CIDR blocks and address ranges.

pub mod cidr;
pub mod family;
pub mod range;
