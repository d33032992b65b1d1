#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// iterative hole filling for sparse rasters.
pub mod inpaint;

/// uniform recoloring of non-empty pixels.
pub mod recolor;
