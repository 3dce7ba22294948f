//! Dictionary lookups: the gateway contract and its implementations.

mod gateway;
mod memory;
mod opendict;

pub use gateway::{Candidate, DictionaryGateway, LookupError, LookupErrorKind};
pub use memory::MemoryDictionary;
pub use opendict::{OpenDictConfig, OpenDictGateway, normalize_headword};
