//! Line codecs for the flat record file.
//!
//! # Responsibility
//! - Translate one `Student` to and from one delimited text line.
//!
//! # See also
//! - [`crate::repo::storage`] for whole-file handling.

pub mod record_line;
