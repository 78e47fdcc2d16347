#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]

pub mod paths;
pub mod predict;
pub mod simulate;
pub mod stats;
pub mod types;

#[path = "../compare/mod.rs"]
pub mod compare;
#[path = "../preprocess/mod.rs"]
pub mod preprocess;
#[path = "../regress/mod.rs"]
pub mod regress;
