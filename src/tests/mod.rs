pub mod common;
mod test_filter;
