//! Semantic-differential scales rated by each respondent.

use serde::Serialize;

/// Number of ratings per respondent
pub const SCALE_COUNT: usize = 8;

/// One SD scale. Declaration order is the column order of `sd_scores`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SdScale {
    Quiet,
    Pleasant,
    Luxurious,
    Advanced,
    Powerful,
    Reassuring,
    Exciting,
    Natural,
}

impl SdScale {
    pub const ALL: [SdScale; SCALE_COUNT] = [
        SdScale::Quiet,
        SdScale::Pleasant,
        SdScale::Luxurious,
        SdScale::Advanced,
        SdScale::Powerful,
        SdScale::Reassuring,
        SdScale::Exciting,
        SdScale::Natural,
    ];

    /// Label shown on the questionnaire
    pub fn label(&self) -> &'static str {
        match self {
            SdScale::Quiet => "静か",
            SdScale::Pleasant => "心地よい",
            SdScale::Luxurious => "高級感",
            SdScale::Advanced => "先進的",
            SdScale::Powerful => "力強い",
            SdScale::Reassuring => "安心",
            SdScale::Exciting => "ワクワク",
            SdScale::Natural => "自然",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_order_and_wire_keys() {
        let keys: Vec<serde_json::Value> = SdScale::ALL
            .iter()
            .map(|s| serde_json::to_value(s).unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![
                "quiet",
                "pleasant",
                "luxurious",
                "advanced",
                "powerful",
                "reassuring",
                "exciting",
                "natural"
            ]
        );
        assert_eq!(SdScale::ALL[0].label(), "静か");
        assert_eq!(SdScale::ALL[SCALE_COUNT - 1].label(), "自然");
    }
}
