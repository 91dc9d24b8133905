//! Provider adapters implementing [`crate::DataSource`].

mod file;
mod yahoo;

pub use file::FileSource;
pub use yahoo::YahooAdapter;
