use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{lenient_list, lenient_text};

/// Coarse compatibility label. The model must pick one of these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    StrongMatch,
    ModerateMatch,
    WeakMatch,
    PoorMatch,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::StrongMatch,
        Verdict::ModerateMatch,
        Verdict::WeakMatch,
        Verdict::PoorMatch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Verdict::StrongMatch => "STRONG_MATCH",
            Verdict::ModerateMatch => "MODERATE_MATCH",
            Verdict::WeakMatch => "WEAK_MATCH",
            Verdict::PoorMatch => "POOR_MATCH",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verdict {
    type Err = String;

    /// Accepts the canonical labels plus the spellings models drift into:
    /// "Strong Match", "moderate-match", "WEAK".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        let stem = normalized.strip_suffix("_MATCH").unwrap_or(&normalized);
        match stem {
            "STRONG" => Ok(Verdict::StrongMatch),
            "MODERATE" => Ok(Verdict::ModerateMatch),
            "WEAK" => Ok(Verdict::WeakMatch),
            "POOR" => Ok(Verdict::PoorMatch),
            _ => Err(format!(
                "unknown verdict '{s}', expected one of {}",
                Verdict::ALL.map(Verdict::label).join(", ")
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The model's compatibility assessment of a résumé against a job description.
///
/// `match_percentage` and `verdict` are required; everything else defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchVerdict {
    #[serde(deserialize_with = "percentage")]
    pub match_percentage: i64,
    pub verdict: Verdict,
    #[serde(default, deserialize_with = "lenient_list")]
    pub matching_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub missing_critical_requirements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub missing_preferred_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub experience_assessment: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education_fit: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub key_strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub gaps_to_address: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub interview_likelihood: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
}

/// Integer percentage; also accepts `72.4`, `"72"` and `"72%"`. Range is not enforced.
fn percentage<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| de::Error::custom(format!("match_percentage out of range: {n}"))),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f.round() as i64))
                .map_err(|_| de::Error::custom(format!("match_percentage is not a number: {s}")))
        }
        other => Err(de::Error::custom(format!(
            "match_percentage must be a number, found {other}"
        ))),
    }
}
