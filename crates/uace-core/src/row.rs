//! Candidate input rows as exported from the results spreadsheet.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One spreadsheet row keyed by its column headers.
///
/// Missing or `null` cells become empty strings; numeric cells (index
/// numbers, dates) are kept as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Candidate_Name", default, deserialize_with = "cell_text")]
    pub name: String,
    #[serde(rename = "IndexNo", default, deserialize_with = "cell_text")]
    pub index_no: String,
    #[serde(rename = "Sex", default, deserialize_with = "cell_text")]
    pub sex: String,
    #[serde(rename = "Res. Code", default, deserialize_with = "cell_text")]
    pub res_code: String,
    #[serde(rename = "DATE OF BIRTH", default, deserialize_with = "cell_text")]
    pub dob: String,
    #[serde(rename = "Subjects", default, deserialize_with = "cell_text")]
    pub subjects: String,
}

fn cell_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_headers() {
        let row: RawRow = serde_json::from_str(
            r#"{
                "Candidate_Name": "OKELLO JAMES",
                "IndexNo": "U0001/501",
                "Sex": "M",
                "Res. Code": "2",
                "DATE OF BIRTH": "12/03/2006",
                "Subjects": "GEP-5 [1-5]"
            }"#,
        )
        .unwrap();
        assert_eq!(row.name, "OKELLO JAMES");
        assert_eq!(row.index_no, "U0001/501");
        assert_eq!(row.res_code, "2");
        assert_eq!(row.dob, "12/03/2006");
        assert_eq!(row.subjects, "GEP-5 [1-5]");
    }

    #[test]
    fn missing_and_null_cells_are_empty() {
        let row: RawRow = serde_json::from_str(r#"{"Candidate_Name": null}"#).unwrap();
        assert_eq!(row, RawRow::default());
    }

    #[test]
    fn numeric_cells_become_text() {
        let row: RawRow =
            serde_json::from_str(r#"{"IndexNo": 501, "Res. Code": 2, "Sex": true}"#).unwrap();
        assert_eq!(row.index_no, "501");
        assert_eq!(row.res_code, "2");
        assert_eq!(row.sex, "true");
    }

    #[test]
    fn unknown_columns_ignored() {
        let row: RawRow =
            serde_json::from_str(r#"{"Sex": "F", "Stream": "S6 East"}"#).unwrap();
        assert_eq!(row.sex, "F");
    }
}
