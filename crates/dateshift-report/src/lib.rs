//! Value-frequency scan reports over delimited text files.

pub mod scan;
