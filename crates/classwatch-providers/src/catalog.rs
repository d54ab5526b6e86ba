//! Structured catalog search API client.
//!
//! One GET per lookup, `Authorization: Bearer null` (the public
//! catalog requires the header but no real token). The server caps a
//! page at 200 rows and hands back a `scrollId` for the rest; only
//! subject-wide searches follow it.

use serde_json::Value;

use classwatch_core::error::{Result, WatchError};
use classwatch_core::types::SectionRow;

pub struct CatalogClient {
    client: reqwest::Client,
    api_url: String,
}

impl CatalogClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
        }
    }

    /// All sections for one subject + catalog number, single page.
    pub async fn sections(
        &self,
        catalog_num: &str,
        subject: &str,
        term: &str,
    ) -> Result<Vec<SectionRow>> {
        let payload = self.fetch(subject, term, Some(catalog_num), None).await?;
        Ok(parse_sections(&payload))
    }

    /// Subject-wide search, following scroll pagination when no
    /// catalog number narrows the query.
    pub async fn search(
        &self,
        subject: &str,
        term: &str,
        catalog_num: Option<&str>,
    ) -> Result<Vec<SectionRow>> {
        let mut payload = self.fetch(subject, term, catalog_num, None).await?;
        let mut rows = parse_sections(&payload);

        let total = payload["total"]["value"].as_u64().unwrap_or(0) as usize;
        let mut scroll_id = payload["scrollId"].as_str().map(String::from);

        while let Some(ref sid) = scroll_id {
            if catalog_num.is_some() || rows.len() >= total {
                break;
            }
            payload = self
                .fetch(subject, term, catalog_num, Some(sid.as_str()))
                .await?;
            let page = parse_sections(&payload);
            if page.is_empty() {
                break;
            }
            rows.extend(page);
            scroll_id = payload["scrollId"].as_str().map(String::from);
        }

        Ok(rows)
    }

    async fn fetch(
        &self,
        subject: &str,
        term: &str,
        catalog_num: Option<&str>,
        scroll_id: Option<&str>,
    ) -> Result<Value> {
        let mut query = vec![
            ("refine", "Y".to_string()),
            ("campusOrOnlineSelection", "A".to_string()),
            ("honors", "F".to_string()),
            ("promod", "F".to_string()),
            ("searchType", "all".to_string()),
            ("subject", subject.to_uppercase()),
            ("term", term.to_string()),
        ];
        if let Some(num) = catalog_num {
            query.push(("catalogNbr", num.to_string()));
        }
        if let Some(sid) = scroll_id {
            query.push(("scrollId", sid.to_string()));
        }

        let response = self
            .client
            .get(&self.api_url)
            .header("Authorization", "Bearer null")
            .query(&query)
            .timeout(std::time::Duration::from_secs(20))
            .send()
            .await
            .map_err(|e| WatchError::Lookup(format!("Catalog API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Lookup(format!("Catalog API error {status}")));
        }
        tracing::debug!("Catalog API hit: {subject} {catalog_num:?} term {term}");

        response
            .json()
            .await
            .map_err(|e| WatchError::Lookup(format!("Invalid catalog response: {e}")))
    }
}

/// Flatten a catalog payload's `classes[].CLAS` rows.
pub(crate) fn parse_sections(payload: &Value) -> Vec<SectionRow> {
    payload["classes"]
        .as_array()
        .map(|items| items.iter().map(parse_section).collect())
        .unwrap_or_default()
}

fn parse_section(item: &Value) -> SectionRow {
    let clas = &item["CLAS"];

    let instructor = match &clas["INSTRUCTORSLIST"] {
        Value::Array(names) => {
            let joined = names
                .iter()
                .filter_map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() { "TBA".into() } else { joined }
        }
        Value::String(name) if !name.is_empty() => name.clone(),
        _ => "TBA".into(),
    };

    let start = clean_time_fragment(clas["STARTTIME"].as_str());
    let end = clean_time_fragment(clas["ENDTIME"].as_str());
    let time = if start.is_empty() {
        "TBA".into()
    } else {
        format!("{start}-{end}")
    };

    SectionRow {
        title: string_or(clas, "TITLE", "Unknown"),
        instructor,
        days: string_or(clas, "DAYS", "TBA"),
        time,
        location: string_or(clas, "LOCATION", "TBA"),
        enrolled: count_field(clas, "ENRLTOT"),
        capacity: count_field(clas, "ENRLCAP"),
        catalog_num: string_or(clas, "CATALOGNBR", "N/A"),
        class_nbr: string_or(clas, "CLASSNBR", "N/A"),
    }
}

/// Times arrive with markup baked in ("7:30 AM<br/>&nbsp;").
fn clean_time_fragment(raw: Option<&str>) -> String {
    raw.unwrap_or("")
        .replace("<br/>", "")
        .replace("&nbsp;", "")
        .trim()
        .to_string()
}

fn string_or(clas: &Value, key: &str, fallback: &str) -> String {
    match clas[key].as_str() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

/// Counts come back as numbers or numeric strings depending on the
/// endpoint revision; missing means zero.
fn count_field(clas: &Value, key: &str) -> u32 {
    match &clas[key] {
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_full_section_row() {
        let payload = json!({
            "classes": [{
                "CLAS": {
                    "TITLE": "Object-Oriented Programming",
                    "INSTRUCTORSLIST": ["A. Turing", "G. Hopper"],
                    "DAYS": "MWF",
                    "STARTTIME": "9:00 AM<br/>&nbsp;",
                    "ENDTIME": "9:50 AM<br/>",
                    "LOCATION": "Tempe - CAVC101",
                    "ENRLTOT": 28,
                    "ENRLCAP": 30,
                    "CATALOGNBR": "205",
                    "CLASSNBR": "12345"
                }
            }]
        });
        let rows = parse_sections(&payload);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "Object-Oriented Programming");
        assert_eq!(row.instructor, "A. Turing, G. Hopper");
        assert_eq!(row.time, "9:00 AM-9:50 AM");
        assert_eq!(row.enrolled, 28);
        assert_eq!(row.capacity, 30);
        assert_eq!(row.open_seats(), 2);
    }

    #[test]
    fn instructor_string_and_empty_list_fall_back() {
        let as_string = json!({"classes": [{"CLAS": {"INSTRUCTORSLIST": "B. Liskov"}}]});
        assert_eq!(parse_sections(&as_string)[0].instructor, "B. Liskov");

        let empty_list = json!({"classes": [{"CLAS": {"INSTRUCTORSLIST": []}}]});
        assert_eq!(parse_sections(&empty_list)[0].instructor, "TBA");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let payload = json!({"classes": [{"CLAS": {}}]});
        let row = &parse_sections(&payload)[0];
        assert_eq!(row.title, "Unknown");
        assert_eq!(row.days, "TBA");
        assert_eq!(row.time, "TBA");
        assert_eq!(row.location, "TBA");
        assert_eq!(row.enrolled, 0);
        assert_eq!(row.capacity, 0);
    }

    #[test]
    fn stringly_typed_counts_parse() {
        let payload = json!({"classes": [{"CLAS": {"ENRLTOT": "28", "ENRLCAP": "30"}}]});
        let row = &parse_sections(&payload)[0];
        assert_eq!(row.enrolled, 28);
        assert_eq!(row.capacity, 30);
    }

    #[test]
    fn empty_payload_yields_no_rows() {
        assert!(parse_sections(&json!({})).is_empty());
        assert!(parse_sections(&json!({"classes": []})).is_empty());
    }
}
