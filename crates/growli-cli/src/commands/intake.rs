use serde_json::Value;

use growli_core::intake::{snapshots_from_extraction, ExtractedFields};

use crate::commands::analysis::InputArgs;
use crate::input;

pub fn run_extract(args: InputArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fields: ExtractedFields = input::read_request(args.input.as_deref(), "extraction")?;
    let result = snapshots_from_extraction(&fields)?;
    Ok(serde_json::to_value(result)?)
}
