//! Surface-syntax decoders: YAML (C7) and JWCC (C8). Both produce a tree
//! implementing [`crate::schema::DecodeNode`], so every schema decoder in
//! `crate::schema::decode` is written once and shared by both.

pub mod jwcc;
pub mod yaml;
