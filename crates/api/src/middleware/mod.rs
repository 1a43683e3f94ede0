//! Request extractors.
//!
//! - [`record::RecordPayload`] -- Decodes a JSON or form body into an `InputRecord`.

pub mod record;
