mod compressed;
mod plain;

pub use compressed::Zstd;
pub use plain::Plain;
