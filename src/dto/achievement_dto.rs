use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAchievementPayload {
    pub achievement_type: Option<String>,
    pub achievement_name: Option<String>,
    pub achievement_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAchievement {
    pub achievement_type: String,
    pub achievement_name: String,
    pub achievement_description: String,
}

impl CreateAchievementPayload {
    pub fn parse(self) -> Result<NewAchievement> {
        Ok(NewAchievement {
            achievement_type: required(
                self.achievement_type,
                "MISSING_ACHIEVEMENT_TYPE",
                "achievementType is required",
            )?,
            achievement_name: required(
                self.achievement_name,
                "MISSING_ACHIEVEMENT_NAME",
                "achievementName is required",
            )?,
            achievement_description: required(
                self.achievement_description,
                "MISSING_ACHIEVEMENT_DESCRIPTION",
                "achievementDescription is required",
            )?,
        })
    }
}

fn required(value: Option<String>, code: &'static str, message: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::bad_request(code, message))
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAchievementsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_three_fields_are_required() {
        let parse = |v: serde_json::Value| {
            serde_json::from_value::<CreateAchievementPayload>(v)
                .unwrap()
                .parse()
        };
        let ok = parse(json!({
            "achievementType": "streak_5",
            "achievementName": " On Fire ",
            "achievementDescription": "Five correct answers in a row"
        }))
        .unwrap();
        assert_eq!(ok.achievement_name, "On Fire");

        assert_eq!(
            parse(json!({ "achievementName": "a", "achievementDescription": "b" }))
                .unwrap_err()
                .code(),
            "MISSING_ACHIEVEMENT_TYPE"
        );
        assert_eq!(
            parse(json!({ "achievementType": "a", "achievementName": " ", "achievementDescription": "b" }))
                .unwrap_err()
                .code(),
            "MISSING_ACHIEVEMENT_NAME"
        );
        assert_eq!(
            parse(json!({ "achievementType": "a", "achievementName": "b" }))
                .unwrap_err()
                .code(),
            "MISSING_ACHIEVEMENT_DESCRIPTION"
        );
    }
}
