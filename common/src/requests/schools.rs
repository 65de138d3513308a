use crate::model::school::MatchQuery;
use serde::Deserialize;

/// School finder form as submitted; validated into a `MatchQuery`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSearchRequest {
    pub budget: String,
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default)]
    pub class_level: String,
}

impl SchoolSearchRequest {
    pub fn into_query(self) -> Result<MatchQuery, String> {
        let budget = self
            .budget
            .trim()
            .trim_start_matches('₹')
            .trim()
            .replace([',', ' '], "");
        let budget = match budget.parse::<u64>() {
            Ok(b) if b > 0 => b,
            _ => return Err("Please enter a valid budget".to_string()),
        };

        let boards: Vec<String> = self
            .boards
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        if boards.is_empty() {
            return Err("Please select at least one board".to_string());
        }

        let class_level = self.class_level.trim().to_string();
        if class_level.is_empty() {
            return Err("Please select a class".to_string());
        }

        Ok(MatchQuery {
            budget,
            boards,
            class_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(budget: &str, boards: &[&str], class_level: &str) -> SchoolSearchRequest {
        SchoolSearchRequest {
            budget: budget.into(),
            boards: boards.iter().map(|b| b.to_string()).collect(),
            class_level: class_level.into(),
        }
    }

    #[test]
    fn accepts_formatted_budgets() {
        let q = request("₹ 1,50,000", &["CBSE"], " Class 5 ").into_query().unwrap();
        assert_eq!(q.budget, 150_000);
        assert_eq!(q.class_level, "Class 5");
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(request("0", &["CBSE"], "Class 5").into_query().is_err());
        assert!(request("-5", &["CBSE"], "Class 5").into_query().is_err());
        assert!(request("lots", &["CBSE"], "Class 5").into_query().is_err());
        assert!(request("100000", &[" "], "Class 5").into_query().is_err());
        assert!(request("100000", &["CBSE"], "").into_query().is_err());
    }
}
