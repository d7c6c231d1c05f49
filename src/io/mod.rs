// src/io/mod.rs
pub mod atom_info;
pub mod pdb;
