pub mod comments;
pub mod enrich;
pub mod extract;
pub mod headers;
pub mod import;
pub mod log;
pub mod lookup;
pub mod roster;
pub mod transform;
