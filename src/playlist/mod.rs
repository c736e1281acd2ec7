mod fetcher;
mod parser;

pub use fetcher::{is_remote, PlaylistFetcher};
pub use parser::parse_playlist;
