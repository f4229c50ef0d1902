use crate::model::Analysis;
use anyhow::Result;

pub fn generate_json_string(analysis: &Analysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
