//! # datapack-parser
//!
//! Parsing and settings compilation for time-scale chart datapacks.
//!
//! Layout
//!
//! Everything lives under `src/datapack`:
//!   ├── parsing      Tab-delimited datapack text into a column tree
//!   ├── maps         Map-pack text into a map index and hierarchy, plus bounds math
//!   ├── columns      The column tree, its name index and the mutation operations
//!   ├── settings     Settings document codec, apply and compile
//!   └── formats      Text renderings of a column tree
//!
//! The crate does no network or process work. File acquisition is limited to the
//! [loader](datapack::loader), which only reads paths into [SourceFile](datapack::loader::SourceFile)s.
//!
//! For test sources, see the [testing module](datapack::testing).

pub mod datapack;
