#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `blo-rs` decodes legacy BLO archives, their CFS sprite animations and
//! embedded audio, and composites sprite frames into RGBA images.

pub use blo_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use blo_dylib;
