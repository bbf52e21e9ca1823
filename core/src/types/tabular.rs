use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// One row of the export/import dataset.
///
/// Field names double as column names for the self-describing encodings
/// (JSON, CSV, named MessagePack), so they must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TabularRecord {
    pub id: u64,
    pub float: f64,
    pub int: i64,
    pub string: String,
}

impl TabularRecord {
    pub const COLUMNS: [&'static str; 4] = ["id", "float", "int", "string"];
}
