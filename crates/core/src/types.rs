/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque revision token assigned by the document store on every write.
///
/// The empty string means "this document has never been stored".
pub type Revision = String;
