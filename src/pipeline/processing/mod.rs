// Sheet processing: decoding, column resolution and row normalization

pub mod columns;
pub mod normalize;
pub mod parser;

pub use columns::{resolve_columns, HeaderMap};
pub use normalize::{DefaultNormalizer, Normalizer};
pub use parser::{decode_sheet, SheetDecoder, SheetFormat};
