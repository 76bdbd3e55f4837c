pub mod case;
pub mod hash;
