// libs/budget-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(default)]
    pub description: String,
    /// Free-form budget rows: non-numeric prices count as zero.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveBudgetRequest {
    pub patient_name: String,
    pub procedure: String,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

impl ApproveBudgetRequest {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetApproval {
    pub patient_name: String,
    pub procedure: String,
    pub total: f64,
    /// Whether the name matched a roster patient whose identity was
    /// snapshotted into the feed entries.
    pub patient_matched: bool,
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn totals_tolerate_junk_prices() {
        let request: ApproveBudgetRequest = serde_json::from_value(json!({
            "patient_name": "Ana Silva",
            "procedure": "Dental implant",
            "items": [
                { "description": "Titanium post", "price": 1200 },
                { "description": "Surgical work", "price": "500" },
                { "description": "Untyped" }
            ]
        }))
        .unwrap();

        assert_eq!(request.total(), 1700.0);
    }
}
