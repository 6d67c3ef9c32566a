//! Stored records.
//!
//! Wines and feedback are relayed as the caller submitted them; their columns
//! are owned by the database, so both are kept as plain JSON objects.

use serde_json::{Map, Value};

/// One row of a table, as a JSON object.
pub type Record = Map<String, Value>;

/// A wine entry (name, vintage, country, ...).
pub type WineRecord = Record;

/// A user's feedback on a wine (rating, comment, wine reference, ...).
pub type FeedbackRecord = Record;
